use chrono::{Datelike, NaiveDate};
use image::{RgbaImage, imageops, imageops::FilterType};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use super::text::{build_text_lines, draw_text_block, draw_year_label, ordinal};
use super::{
    AnniversaryLayout, BirthdayLayout, FontSet, PhotoBox, Placement, Poster, PosterError,
    PosterKind,
};
use crate::Secrets;
use crate::employee::EmployeeRecord;
use crate::photo::{
    BackgroundRemover, FaceDetector, NoBackgroundRemoval, NoFaceDetection, PhotoError,
    PhotoFetcher, RetryPolicy, prepare_anniversary_photo, prepare_birthday_photo,
};

/// Composes birthday and anniversary posters.
///
/// The engine owns the photo capabilities and the font set; layouts, secrets
/// and the target date are passed per call.
pub struct PosterEngine {
    fetcher: Arc<dyn PhotoFetcher>,
    background_remover: Arc<dyn BackgroundRemover>,
    face_detector: Arc<dyn FaceDetector>,
    retry: RetryPolicy,
    fonts: FontSet,
}

impl PosterEngine {
    pub fn new(fetcher: Arc<dyn PhotoFetcher>, fonts: FontSet) -> Self {
        Self {
            fetcher,
            background_remover: Arc::new(NoBackgroundRemoval),
            face_detector: Arc::new(NoFaceDetection),
            retry: RetryPolicy::default(),
            fonts,
        }
    }

    pub fn with_background_remover(mut self, remover: Arc<dyn BackgroundRemover>) -> Self {
        self.background_remover = remover;
        self
    }

    pub fn with_face_detector(mut self, detector: Arc<dyn FaceDetector>) -> Self {
        self.face_detector = detector;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn fonts(&self) -> &FontSet {
        &self.fonts
    }

    pub async fn generate_birthday_poster(
        &self,
        employee: &EmployeeRecord,
        layout: &BirthdayLayout,
        secrets: &Secrets,
        date: NaiveDate,
    ) -> Result<Poster, PosterError> {
        validate_photo_box(&layout.photo_box)?;
        let mut canvas = load_template(&layout.template)?;

        let mut photo = None;
        if let Some(url) = employee.photo_url() {
            match self.birthday_photo(url, secrets).await {
                Ok(prepared) => {
                    photo = Some(place_birthday_photo(&mut canvas, &prepared, &layout.photo_box));
                }
                Err(e) => warn!(
                    "Birthday photo for {} skipped ({}): {}",
                    employee.name, date, e
                ),
            }
        }

        let text_lines = build_text_lines(employee, PosterKind::Birthday);
        draw_text_block(&mut canvas, &text_lines, &layout.text_block, &self.fonts)?;

        info!(
            "Composed birthday poster for {} (photo: {})",
            employee.name,
            photo.is_some()
        );
        Ok(Poster {
            kind: PosterKind::Birthday,
            image: canvas,
            text_lines,
            year_label: None,
            photo,
        })
    }

    pub async fn generate_anniversary_poster(
        &self,
        employee: &EmployeeRecord,
        layout: &AnniversaryLayout,
        _secrets: &Secrets,
        date: NaiveDate,
    ) -> Result<Poster, PosterError> {
        validate_photo_box(&layout.photo_box)?;
        let mut canvas = load_template(&layout.template)?;

        let years = anniversary_years(employee.date_of_joining, date);
        let year_label = ordinal(years);
        draw_year_label(&mut canvas, &year_label, &layout.year_label, &self.fonts)?;

        let mut photo = None;
        if let Some(url) = employee.photo_url() {
            match self.anniversary_photo(url, &layout.photo_box).await {
                Ok(prepared) => {
                    photo = Some(place_anniversary_photo(&mut canvas, &prepared, &layout.photo_box));
                }
                Err(e) => warn!(
                    "Anniversary photo for {} skipped ({}): {}",
                    employee.name, date, e
                ),
            }
        }

        let text_lines = build_text_lines(employee, PosterKind::Anniversary);
        draw_text_block(&mut canvas, &text_lines, &layout.text_block, &self.fonts)?;

        info!(
            "Composed {} anniversary poster for {} (photo: {})",
            year_label,
            employee.name,
            photo.is_some()
        );
        Ok(Poster {
            kind: PosterKind::Anniversary,
            image: canvas,
            text_lines,
            year_label: Some(year_label),
            photo,
        })
    }

    async fn birthday_photo(&self, url: &str, secrets: &Secrets) -> Result<RgbaImage, PhotoError> {
        let bytes = self.fetcher.fetch(url).await?;
        prepare_birthday_photo(
            &bytes,
            secrets.background_removal_api_key.as_deref(),
            self.background_remover.as_ref(),
            &self.retry,
        )
        .await
    }

    async fn anniversary_photo(&self, url: &str, photo_box: &PhotoBox) -> Result<RgbaImage, PhotoError> {
        let bytes = self.fetcher.fetch(url).await?;
        prepare_anniversary_photo(&bytes, photo_box.w, photo_box.h, self.face_detector.as_ref())
    }
}

/// Whole years between the joining year and `date`'s year; 0 without a joining date.
pub fn anniversary_years(date_of_joining: Option<NaiveDate>, date: NaiveDate) -> i32 {
    date_of_joining
        .map(|joined| date.year() - joined.year())
        .unwrap_or(0)
}

/// Contain-fit `photo` into `photo_box`, anchored bottom-left.
pub fn contain_fit(photo: (u32, u32), photo_box: &PhotoBox) -> Placement {
    let (photo_w, photo_h) = photo;
    let scale = (photo_box.w as f64 / photo_w as f64).min(photo_box.h as f64 / photo_h as f64);
    let width = ((photo_w as f64 * scale).round() as u32).clamp(1, photo_box.w.max(1));
    let height = ((photo_h as f64 * scale).round() as u32).clamp(1, photo_box.h.max(1));

    Placement {
        x: photo_box.x as i64,
        y: photo_box.y as i64 + photo_box.h as i64 - height as i64,
        width,
        height,
    }
}

fn place_birthday_photo(canvas: &mut RgbaImage, photo: &RgbaImage, photo_box: &PhotoBox) -> Placement {
    let placement = contain_fit(photo.dimensions(), photo_box);
    let scaled = imageops::resize(photo, placement.width, placement.height, FilterType::Lanczos3);
    imageops::overlay(canvas, &scaled, placement.x, placement.y);
    placement
}

fn place_anniversary_photo(canvas: &mut RgbaImage, photo: &RgbaImage, photo_box: &PhotoBox) -> Placement {
    imageops::overlay(canvas, photo, photo_box.x as i64, photo_box.y as i64);
    Placement {
        x: photo_box.x as i64,
        y: photo_box.y as i64,
        width: photo.width(),
        height: photo.height(),
    }
}

fn load_template(path: &Path) -> Result<RgbaImage, PosterError> {
    let template = image::open(path).map_err(|source| PosterError::TemplateError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(template.to_rgba8())
}

fn validate_photo_box(photo_box: &PhotoBox) -> Result<(), PosterError> {
    if photo_box.w == 0 || photo_box.h == 0 {
        return Err(PosterError::InvalidLayout(format!(
            "photo_box must have a non-zero size, got {}x{}",
            photo_box.w, photo_box.h
        )));
    }
    Ok(())
}
