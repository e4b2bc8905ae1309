use crate::Config;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum StartupCheckError {
    #[error("Failed to create output directory {path:?}: {source}")]
    OutputDirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Poster template does not exist: {0:?}")]
    TemplateMissing(PathBuf),

    #[error("Font file does not exist: {0:?}")]
    FontMissing(PathBuf),
}

impl StartupCheckError {
    /// Critical failures make every poster of a run fail.
    pub fn is_critical(&self) -> bool {
        !matches!(self, StartupCheckError::FontMissing(_))
    }
}

pub async fn perform_startup_checks(config: &Config) -> Result<(), Vec<StartupCheckError>> {
    let mut errors = Vec::new();

    info!("Performing startup checks...");

    // Templates
    for (kind, template) in [
        ("birthday", &config.birthday.template),
        ("anniversary", &config.anniversary.template),
    ] {
        if template.is_file() {
            info!("{} template exists: {:?}", kind, template);
        } else {
            error!("{} template does not exist: {:?}", kind, template);
            errors.push(StartupCheckError::TemplateMissing(template.clone()));
        }
    }

    // Missing fonts fall back to the built-in face
    let fonts = &config.fonts;
    for (slot, font) in [
        ("regular", &fonts.regular),
        ("bold", &fonts.bold),
        ("year", &fonts.year),
    ] {
        let Some(font) = font.as_ref().filter(|p| !p.as_os_str().is_empty()) else {
            continue;
        };
        if font.is_file() {
            info!("{} font exists: {:?}", slot, font);
        } else {
            warn!("{} font does not exist, built-in font will be used: {:?}", slot, font);
            errors.push(StartupCheckError::FontMissing(font.clone()));
        }
    }

    // Output directory
    let output_dir: &Path = &config.app.output_directory;
    if output_dir.is_dir() {
        info!("Output directory exists: {:?}", output_dir);
    } else {
        info!("Output directory does not exist, creating: {:?}", output_dir);
        if let Err(e) = tokio::fs::create_dir_all(output_dir).await {
            error!("Failed to create output directory: {}", e);
            errors.push(StartupCheckError::OutputDirectoryCreationFailed {
                path: output_dir.to_path_buf(),
                source: e,
            });
        }
    }

    if errors.is_empty() {
        info!("All startup checks passed");
        Ok(())
    } else {
        error!("Startup checks failed with {} errors", errors.len());
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn config_in(dir: &Path, fonts: &str) -> Config {
        let content = format!(
            r#"
[app]
output_directory = "{dir}/output/posters"

[data_source]
mode = "sample_json"
sample_url = "https://example.com/employees.json"

[fonts]
{fonts}

[birthday]
template = "{dir}/birthday.png"
photo_box = {{ x = 10, y = 10, w = 40, h = 40 }}
text_block = {{ x = 60, y = 20 }}

[anniversary]
template = "{dir}/anniversary.png"
photo_box = {{ x = 10, y = 10, w = 40, h = 40 }}
text_block = {{ x = 60, y = 20 }}
"#,
            dir = dir.display(),
            fonts = fonts
        );
        Config::from_toml(&content).unwrap()
    }

    fn write_templates(dir: &Path) {
        for name in ["birthday.png", "anniversary.png"] {
            RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]))
                .save(dir.join(name))
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_checks_pass_and_create_output_directory() {
        let temp_dir = TempDir::new().unwrap();
        write_templates(temp_dir.path());
        let config = config_in(temp_dir.path(), "");

        assert!(perform_startup_checks(&config).await.is_ok());
        assert!(temp_dir.path().join("output/posters").is_dir());
    }

    #[tokio::test]
    async fn test_missing_templates_are_critical() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(temp_dir.path(), "");

        let errors = perform_startup_checks(&config).await.unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| matches!(e, StartupCheckError::TemplateMissing(_))));
        assert!(errors.iter().all(StartupCheckError::is_critical));
    }

    #[tokio::test]
    async fn test_missing_font_is_a_warning() {
        let temp_dir = TempDir::new().unwrap();
        write_templates(temp_dir.path());
        let config = config_in(temp_dir.path(), r#"bold = "/nonexistent/Bold.ttf"
regular = """#);

        let errors = perform_startup_checks(&config).await.unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], StartupCheckError::FontMissing(_)));
        assert!(!errors[0].is_critical());
    }

    #[tokio::test]
    async fn test_output_directory_blocked_by_file() {
        let temp_dir = TempDir::new().unwrap();
        write_templates(temp_dir.path());
        std::fs::write(temp_dir.path().join("output"), b"not a directory").unwrap();
        let config = config_in(temp_dir.path(), "");

        let errors = perform_startup_checks(&config).await.unwrap_err();
        assert!(matches!(
            errors.as_slice(),
            [StartupCheckError::OutputDirectoryCreationFailed { .. }]
        ));
    }
}
