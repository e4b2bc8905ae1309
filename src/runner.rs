//! Daily batch: fetch employees, render the posters due today, mail them out.

use chrono::{Datelike, NaiveDate};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::email::{Attachment, DynEmailProvider, EmailError, Recipients, greeting_message};
use crate::employee::{
    DynEmployeeSource, EmployeeError, EmployeeRecord, SampleJsonSource, ZingHrSource,
    map_employee,
};
use crate::photo::{HttpBackgroundRemover, HttpPhotoFetcher, PhotoError};
use crate::poster::{PosterEngine, PosterError, PosterKind, poster_to_bytes};
use crate::{Config, DataSourceConfig, Secrets};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Employee source error: {0}")]
    EmployeeError(#[from] EmployeeError),

    #[error("Poster error: {0}")]
    PosterError(#[from] PosterError),

    #[error("Photo client error: {0}")]
    PhotoError(#[from] PhotoError),

    #[error("Email error: {0}")]
    EmailError(#[from] EmailError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub employees: usize,
    pub birthday_posters: usize,
    pub anniversary_posters: usize,
    pub failed_posters: usize,
    pub emails_sent: usize,
    pub email_failures: usize,
}

/// Posters rendered during a run, grouped for mailing.
#[derive(Debug, Default)]
pub struct RenderedPosters {
    pub birthday: Vec<Attachment>,
    pub anniversary: Vec<Attachment>,
    pub failed: usize,
}

/// `name` reduced to `[A-Za-z0-9_.-]`, anything else becoming `_`, or
/// "employee" when blank.
pub fn safe_name(name: &str) -> String {
    let name = if name.is_empty() { "employee" } else { name };
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub fn poster_filename(kind: PosterKind, name: &str, date: NaiveDate) -> String {
    format!("{}_{}_{}.png", kind, safe_name(name), date.format("%Y-%m-%d"))
}

fn same_day(date: Option<NaiveDate>, today: NaiveDate) -> bool {
    date.is_some_and(|d| d.month() == today.month() && d.day() == today.day())
}

/// Poster kinds due for this employee on `today`.
pub fn due_posters(employee: &EmployeeRecord, today: NaiveDate) -> Vec<PosterKind> {
    let mut due = Vec::new();
    if same_day(employee.date_of_birth, today) {
        due.push(PosterKind::Birthday);
    }
    if same_day(employee.date_of_joining, today) {
        due.push(PosterKind::Anniversary);
    }
    due
}

/// Build the poster engine with the capabilities enabled in the config.
pub fn build_engine(config: &Config) -> Result<PosterEngine, RunError> {
    let fetcher = Arc::new(HttpPhotoFetcher::new()?);
    let mut engine = PosterEngine::new(fetcher, config.fonts.clone());

    if let Some(background) = &config.background_removal {
        info!("Background removal enabled via {}", background.endpoint);
        let remover = HttpBackgroundRemover::new(
            background.endpoint.clone(),
            Duration::from_secs(background.timeout_seconds),
        )?;
        engine = engine.with_background_remover(Arc::new(remover));
    }

    Ok(engine)
}

pub fn source_from_config(config: &Config, secrets: &Secrets) -> Result<DynEmployeeSource, RunError> {
    match &config.data_source {
        DataSourceConfig::SampleJson { sample_url } => {
            Ok(Box::new(SampleJsonSource::new(sample_url.clone())?))
        }
        DataSourceConfig::ZingHr {
            base_url,
            client_id,
        } => Ok(Box::new(ZingHrSource::new(
            base_url.clone(),
            client_id.clone(),
            secrets.zinghr_client_secret.clone(),
        ))),
    }
}

pub struct Runner {
    config: Config,
    secrets: Secrets,
    engine: PosterEngine,
    email: Option<DynEmailProvider>,
}

impl Runner {
    pub fn new(
        config: Config,
        secrets: Secrets,
        engine: PosterEngine,
        email: Option<DynEmailProvider>,
    ) -> Self {
        Self {
            config,
            secrets,
            engine,
            email,
        }
    }

    /// Fetch employees from `source` and process everything due on `today`.
    pub async fn run(
        &self,
        source: &DynEmployeeSource,
        today: NaiveDate,
    ) -> Result<RunSummary, RunError> {
        info!("Fetching employees from {}", source.name());
        let records = source.fetch_employees().await?;
        self.run_records(&records, today).await
    }

    pub async fn run_records(&self, records: &[Value], today: NaiveDate) -> Result<RunSummary, RunError> {
        let employees: Vec<EmployeeRecord> = records
            .iter()
            .map(|raw| map_employee(raw, &self.config.field_mapping))
            .collect();

        let rendered = self.render_due(&employees, today).await?;
        let mut summary = RunSummary {
            employees: employees.len(),
            birthday_posters: rendered.birthday.len(),
            anniversary_posters: rendered.anniversary.len(),
            failed_posters: rendered.failed,
            ..RunSummary::default()
        };

        let recipients = &self.config.recipients;
        for (kind, posters, to) in [
            (PosterKind::Birthday, rendered.birthday, &recipients.birthday),
            (PosterKind::Anniversary, rendered.anniversary, &recipients.anniversary),
        ] {
            match self.send_greetings(kind, posters, to, today).await {
                Ok(true) => summary.emails_sent += 1,
                Ok(false) => {}
                Err(e) => {
                    error!("Failed to send {} email: {}", kind, e);
                    summary.email_failures += 1;
                }
            }
        }

        info!(
            "Done. {} birthday poster(s), {} anniversary poster(s), {} failure(s).",
            summary.birthday_posters, summary.anniversary_posters, summary.failed_posters
        );
        Ok(summary)
    }

    /// Render and save every poster due on `today`. Individual failures are
    /// logged and counted without stopping the batch.
    pub async fn render_due(
        &self,
        employees: &[EmployeeRecord],
        today: NaiveDate,
    ) -> Result<RenderedPosters, RunError> {
        let output_dir = &self.config.app.output_directory;
        tokio::fs::create_dir_all(output_dir).await?;

        let mut rendered = RenderedPosters::default();
        for employee in employees {
            for kind in due_posters(employee, today) {
                match self.render_and_save(kind, employee, today, output_dir).await {
                    Ok(attachment) => {
                        info!("[{}] Generated poster for {}", kind, employee.name);
                        match kind {
                            PosterKind::Birthday => rendered.birthday.push(attachment),
                            PosterKind::Anniversary => rendered.anniversary.push(attachment),
                        }
                    }
                    Err(e) => {
                        error!("[{}] ERROR for {}: {}", kind, employee.name, e);
                        rendered.failed += 1;
                    }
                }
            }
        }
        Ok(rendered)
    }

    /// Compose one poster and encode it as PNG.
    pub async fn render_one(
        &self,
        kind: PosterKind,
        employee: &EmployeeRecord,
        date: NaiveDate,
    ) -> Result<Vec<u8>, RunError> {
        let poster = match kind {
            PosterKind::Birthday => {
                self.engine
                    .generate_birthday_poster(employee, &self.config.birthday, &self.secrets, date)
                    .await?
            }
            PosterKind::Anniversary => {
                self.engine
                    .generate_anniversary_poster(
                        employee,
                        &self.config.anniversary,
                        &self.secrets,
                        date,
                    )
                    .await?
            }
        };
        Ok(poster_to_bytes(&poster.image)?)
    }

    async fn render_and_save(
        &self,
        kind: PosterKind,
        employee: &EmployeeRecord,
        date: NaiveDate,
        output_dir: &Path,
    ) -> Result<Attachment, RunError> {
        let bytes = self.render_one(kind, employee, date).await?;
        let filename = poster_filename(kind, &employee.name, date);
        tokio::fs::write(output_dir.join(&filename), &bytes).await?;
        Ok(Attachment::png(filename, bytes))
    }

    /// Returns whether an email actually went out.
    async fn send_greetings(
        &self,
        kind: PosterKind,
        posters: Vec<Attachment>,
        recipients: &Recipients,
        date: NaiveDate,
    ) -> Result<bool, RunError> {
        let (Some(provider), Some(email_config)) = (&self.email, &self.config.email) else {
            if !posters.is_empty() {
                warn!("Email disabled, {} {} poster(s) not sent", posters.len(), kind);
            }
            return Ok(false);
        };

        let Some(message) = greeting_message(
            kind,
            posters,
            recipients,
            &email_config.format_from(),
            email_config.reply_to.as_deref(),
            date,
        ) else {
            return Ok(false);
        };

        info!(
            "Sending {} email with {} poster(s) via {}",
            kind,
            message.attachments.len(),
            provider.name()
        );
        provider.send_email(message).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_safe_name() {
        assert_eq!(safe_name("John Doe"), "John_Doe");
        assert_eq!(safe_name(""), "employee");
        assert_eq!(safe_name("Asha"), "Asha");
        assert_eq!(safe_name("A/B \"C\""), "A_B__C_");
        assert_eq!(safe_name("..\\x\r\n"), ".._x__");
        assert_eq!(safe_name("José"), "Jos_");
    }

    #[test]
    fn test_poster_filename_stays_in_output_directory() {
        let filename = poster_filename(PosterKind::Birthday, "../../etc/passwd", date(2024, 3, 15));
        assert_eq!(filename, "birthday_.._.._etc_passwd_2024-03-15.png");
        assert_eq!(std::path::Path::new(&filename).components().count(), 1);
    }

    #[test]
    fn test_poster_filename() {
        assert_eq!(
            poster_filename(PosterKind::Birthday, "John Doe", date(2024, 3, 15)),
            "birthday_John_Doe_2024-03-15.png"
        );
        assert_eq!(
            poster_filename(PosterKind::Anniversary, "", date(2024, 6, 1)),
            "anniversary_employee_2024-06-01.png"
        );
    }

    #[test]
    fn test_due_posters() {
        let employee = EmployeeRecord {
            name: "john doe".to_string(),
            date_of_birth: Some(date(1990, 3, 15)),
            date_of_joining: Some(date(2015, 6, 1)),
            ..EmployeeRecord::default()
        };

        assert_eq!(due_posters(&employee, date(2024, 3, 15)), vec![PosterKind::Birthday]);
        assert_eq!(due_posters(&employee, date(2024, 6, 1)), vec![PosterKind::Anniversary]);
        assert!(due_posters(&employee, date(2024, 6, 2)).is_empty());
        assert!(due_posters(&EmployeeRecord::default(), date(2024, 6, 1)).is_empty());
    }

    #[test]
    fn test_both_posters_on_the_same_day() {
        let employee = EmployeeRecord {
            date_of_birth: Some(date(1990, 6, 1)),
            date_of_joining: Some(date(2015, 6, 1)),
            ..EmployeeRecord::default()
        };
        assert_eq!(
            due_posters(&employee, date(2024, 6, 1)),
            vec![PosterKind::Birthday, PosterKind::Anniversary]
        );
    }
}
