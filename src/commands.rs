use std::path::{Path, PathBuf};
use tracing::info;
use typedfile::config::Config;
use typedfile::file::{FileHandle, FileOptions, TypedValue};
use typedfile::source::engine_from_config;

use crate::cli::{DecodeArgs, EncodeArgs, FetchArgs, MetadataArgs};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub async fn encode(args: EncodeArgs) -> Result<(), AnyError> {
    let default_name = args
        .local_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    let file = FileHandle::new(FileOptions {
        local_path: Some(args.local_path),
        ..metadata_options(args.metadata, default_name)
    })?;

    let typed = file.load().await?.create_typed_value()?;
    write_typed_value(&typed, args.output.as_deref()).await
}

pub async fn fetch(config_path: Option<PathBuf>, args: FetchArgs) -> Result<(), AnyError> {
    let config = Config::load_with(config_path)?;
    let engine = engine_from_config(&config.engine)?;

    let default_name = args
        .remote_path
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .map(str::to_string);

    let file = FileHandle::new(FileOptions {
        remote_path: Some(args.remote_path),
        engine_service: Some(engine),
        ..metadata_options(args.metadata, default_name)
    })?;

    let typed = file.load().await?.create_typed_value()?;
    write_typed_value(&typed, args.output.as_deref()).await
}

pub async fn decode(args: DecodeArgs) -> Result<(), AnyError> {
    let json = tokio::fs::read_to_string(&args.input).await?;
    let typed = TypedValue::from_json_str(&json)?;

    let output = match args.output {
        Some(path) => path,
        None => default_output(&typed)?,
    };

    let file = FileHandle::from_typed_value(typed)?;
    file.load().await?;
    let content = file.into_content().unwrap_or_default();

    tokio::fs::write(&output, &content).await?;
    info!(output = %output.display(), size = content.len(), "Wrote decoded content");

    Ok(())
}

fn metadata_options(metadata: MetadataArgs, default_name: Option<String>) -> FileOptions {
    FileOptions {
        filename: metadata.filename.or(default_name),
        mimetype: Some(metadata.mimetype.to_string()),
        encoding: metadata.encoding,
        ..Default::default()
    }
}

/// Bare file name from valueInfo; directory components are dropped
fn default_output(typed: &TypedValue) -> Result<PathBuf, AnyError> {
    typed
        .value_info
        .filename
        .as_deref()
        .and_then(|name| Path::new(name).file_name())
        .map(PathBuf::from)
        .ok_or_else(|| "typed value has no filename; pass --output".into())
}

async fn write_typed_value(typed: &TypedValue, output: Option<&Path>) -> Result<(), AnyError> {
    let json = typed.to_json_string()?;

    match output {
        Some(path) => {
            tokio::fs::write(path, json).await?;
            info!(output = %path.display(), "Wrote typed value");
        }
        None => println!("{json}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use typedfile::file::ValueInfo;

    fn metadata() -> MetadataArgs {
        MetadataArgs {
            filename: None,
            mimetype: mime::TEXT_PLAIN,
            encoding: Some("utf-8".to_string()),
        }
    }

    #[tokio::test]
    async fn test_encode_then_decode() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("notes.txt");
        let encoded = temp_dir.path().join("notes.json");
        let decoded = temp_dir.path().join("copy.txt");
        fs::write(&source, "some content").unwrap();

        encode(EncodeArgs {
            local_path: source,
            metadata: metadata(),
            output: Some(encoded.clone()),
        })
        .await
        .unwrap();

        let typed = TypedValue::from_json_str(&fs::read_to_string(&encoded).unwrap()).unwrap();
        assert_eq!(typed.value_info, ValueInfo::new("notes.txt", "text/plain", "utf-8"));

        decode(DecodeArgs {
            input: encoded,
            output: Some(decoded.clone()),
        })
        .await
        .unwrap();

        assert_eq!(fs::read_to_string(decoded).unwrap(), "some content");
    }

    #[tokio::test]
    async fn test_fetch_from_local_engine() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("engine");
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("docs/report.txt"), "remote content").unwrap();

        let config_path = temp_dir.path().join("typedfile.toml");
        let toml_content = format!(
            "[engine]\nprovider = \"local\"\nroot = {:?}\n",
            root.display().to_string()
        );
        fs::write(&config_path, toml_content).unwrap();

        let encoded = temp_dir.path().join("report.json");
        fetch(
            Some(config_path),
            FetchArgs {
                remote_path: "docs/report.txt".to_string(),
                metadata: metadata(),
                output: Some(encoded.clone()),
            },
        )
        .await
        .unwrap();

        let typed = TypedValue::from_json_str(&fs::read_to_string(&encoded).unwrap()).unwrap();
        assert_eq!(typed.value_info, ValueInfo::new("report.txt", "text/plain", "utf-8"));
        assert_eq!(typed.decode_value().unwrap(), b"remote content");
    }

    #[test]
    fn test_default_output_strips_directories() {
        let typed = TypedValue {
            value_info: ValueInfo {
                filename: Some("../../etc/passwd".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        assert_eq!(default_output(&typed).unwrap(), PathBuf::from("passwd"));
    }

    #[test]
    fn test_default_output_requires_filename() {
        assert!(default_output(&TypedValue::default()).is_err());
    }
}
