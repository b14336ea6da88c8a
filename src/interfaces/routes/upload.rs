use actix_multipart::{
    form::{tempfile::TempFileConfig, MultipartFormConfig},
    MultipartError,
};
use actix_web::web;

use crate::{errors::AppError, upload::resume::{UploadReceiver, RESUME_FIELD}};

/// Room for multipart headers and text fields.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Bodies are streamed to disk up to this multiple of the resume limit so the
/// receiver can answer with a size error; anything larger is cut off.
const HARD_LIMIT_FACTOR: usize = 2;

pub fn config_routes(cfg: &mut web::ServiceConfig, receiver: &UploadReceiver) {
    let too_large = receiver.too_large_message();
    let max_bytes = receiver.max_bytes();

    cfg.app_data(
        MultipartFormConfig::default()
            .total_limit(max_bytes * HARD_LIMIT_FACTOR + FORM_OVERHEAD_BYTES)
            .memory_limit(FORM_OVERHEAD_BYTES)
            .error_handler(move |err, _req| {
                let app_error = match err {
                    MultipartError::Payload(_) => AppError::field(RESUME_FIELD, too_large.clone()),
                    other => {
                        tracing::debug!("Rejected multipart body: {}", other);
                        AppError::field(RESUME_FIELD, "Resume must be sent as a single multipart file field")
                    }
                };
                app_error.into()
            }),
    );
    cfg.app_data(TempFileConfig::default().directory(receiver.dir()));
}
