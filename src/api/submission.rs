//! Extraction of the pasted content from `POST /`.
//!
//! Accepts both `multipart/form-data` (what `curl -F` sends) and
//! `application/x-www-form-urlencoded` (what `curl -d` and HTML forms send).

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use serde::Deserialize;

use crate::error::ApiError;

/// Url-encoded field names this extractor cares about.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum FormField {
    Text,
    File,
    #[serde(other)]
    Other,
}

/// The `text` and `file` fields of a submission, whichever were sent.
///
/// A field sent more than once keeps its last value.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Submission {
    pub text: Option<Bytes>,
    pub file: Option<Bytes>,
}

impl Submission {
    /// The pasted content; `text` wins when both fields are present.
    pub fn into_content(self) -> Option<Bytes> {
        self.text.or(self.file)
    }
}

#[axum::async_trait]
impl<S> FromRequest<S> for Submission
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, ApiError> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(pairs) = Form::<Vec<(FormField, String)>>::from_request(req, state).await?;
            let mut submission = Submission::default();
            for (field, value) in pairs {
                match field {
                    FormField::Text => submission.text = Some(Bytes::from(value)),
                    FormField::File => submission.file = Some(Bytes::from(value)),
                    FormField::Other => {}
                }
            }
            return Ok(submission);
        }

        let mut multipart = Multipart::from_request(req, state).await?;
        let mut submission = Submission::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("text") => {
                    submission.text = Some(field.bytes().await?);
                }
                Some("file") => {
                    submission.file = Some(field.bytes().await?);
                }
                _ => {}
            }
        }

        Ok(submission)
    }
}
