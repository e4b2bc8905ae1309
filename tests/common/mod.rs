#![allow(dead_code)]

use async_trait::async_trait;
use greetings_poster::Config;
use greetings_poster::email::{EmailError, EmailMessage, EmailProvider};
use greetings_poster::photo::{PhotoError, PhotoFetcher};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use std::sync::Mutex;

pub const TEMPLATE_COLOR: Rgba<u8> = Rgba([20, 40, 120, 255]);

pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

pub fn write_templates(dir: &Path) {
    for name in ["birthday.png", "anniversary.png"] {
        RgbaImage::from_pixel(600, 800, TEMPLATE_COLOR)
            .save(dir.join(name))
            .unwrap();
    }
}

/// Config pointing at templates and an output directory under `dir`.
pub fn test_config(dir: &Path, extra: &str) -> Config {
    let content = format!(
        r#"
[app]
name = "Test Greetings"
output_directory = "{dir}/out"

[data_source]
mode = "sample_json"
sample_url = "https://example.com/employees.json"

[birthday]
template = "{dir}/birthday.png"
photo_box = {{ x = 40, y = 200, w = 240, h = 320 }}
text_block = {{ x = 300, y = 420 }}

[anniversary]
template = "{dir}/anniversary.png"
photo_box = {{ x = 40, y = 200, w = 220, h = 260 }}
text_block = {{ x = 300, y = 460 }}
year_label = {{ x = 40, y = 40, font_size = 48 }}

{extra}
"#,
        dir = dir.display(),
        extra = extra
    );
    Config::from_toml(&content).unwrap()
}

/// Serves the same photo for every URL.
pub struct StaticFetcher(pub Vec<u8>);

#[async_trait]
impl PhotoFetcher for StaticFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>, PhotoError> {
        Ok(self.0.clone())
    }
}

/// Keeps every message instead of sending it.
#[derive(Default)]
pub struct RecordingProvider {
    pub sent: Mutex<Vec<EmailMessage>>,
}

#[async_trait]
impl EmailProvider for RecordingProvider {
    async fn send_email(&self, message: EmailMessage) -> Result<(), EmailError> {
        message.validate()?;
        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    fn name(&self) -> &str {
        "Recording"
    }
}
