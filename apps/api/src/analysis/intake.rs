//! Résumé uploads: format detection, text extraction, and archival to S3.

use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    PlainText,
}

impl ResumeFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ResumeFormat::Pdf => "pdf",
            ResumeFormat::PlainText => "txt",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ResumeFormat::Pdf => "application/pdf",
            ResumeFormat::PlainText => "text/plain",
        }
    }
}

/// Content type wins over the file extension when both are present.
pub fn detect_format(file_name: Option<&str>, content_type: Option<&str>) -> Option<ResumeFormat> {
    let by_type = content_type.and_then(|ct| {
        let ct = ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase();
        match ct.as_str() {
            "application/pdf" => Some(ResumeFormat::Pdf),
            "text/plain" => Some(ResumeFormat::PlainText),
            _ => None,
        }
    });

    by_type.or_else(|| {
        let ext = file_name?.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(ResumeFormat::Pdf),
            "txt" => Some(ResumeFormat::PlainText),
            _ => None,
        }
    })
}

/// Extracts résumé text. PDF parsing is CPU-bound and runs on the blocking pool.
pub async fn extract_text(format: ResumeFormat, data: Bytes) -> Result<String, AppError> {
    match format {
        ResumeFormat::PlainText => String::from_utf8(data.to_vec())
            .map_err(|_| AppError::Validation("Text résumé must be UTF-8".to_string())),
        ResumeFormat::Pdf => {
            let extracted =
                tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
                    .await
                    .map_err(|e| {
                        AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}"))
                    })?;
            extracted.map_err(|e| AppError::Validation(format!("Could not read PDF: {e}")))
        }
    }
}

/// Archive of uploaded résumé files.
#[derive(Clone)]
pub struct ResumeArchive {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl ResumeArchive {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    pub fn object_key(email: &str, format: ResumeFormat, id: Uuid) -> String {
        format!("resumes/{}/{}.{}", email, id, format.extension())
    }

    /// Uploads the original file and returns its object key.
    pub async fn store(
        &self,
        email: &str,
        format: ResumeFormat,
        data: Bytes,
    ) -> Result<String, AppError> {
        let key = Self::object_key(email, format, Uuid::new_v4());
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(data))
            .content_type(format.content_type())
            .send()
            .await
            .map_err(|e| AppError::S3(format!("Résumé upload failed: {e}")))?;

        info!("Archived résumé to s3://{}/{}", self.bucket, key);
        Ok(key)
    }
}
