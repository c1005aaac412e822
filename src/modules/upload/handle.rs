use actix_multipart::Multipart;
use actix_web::{web, HttpRequest};
use futures_util::TryStreamExt;
use uuid::Uuid;
use validator::Validate;

use crate::api::{error, success::Success};
use crate::middlewares::get_claims;
use crate::modules::upload::{
    model::UploadForm, repository::UploadRepository, schema::UploadEntity,
    service::UploadService,
};

struct IncomingFile {
    filename: String,
    mime_type: String,
    bytes: Vec<u8>,
}

const MAX_TEXT_FIELD_SIZE: usize = 64 * 1024;

async fn read_field(
    field: &mut actix_multipart::Field,
    limit: usize,
) -> Result<Vec<u8>, error::Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(|_| error::Error::InternalServer)? {
        if bytes.len() + chunk.len() > limit {
            return Err(error::Error::bad_request(format!(
                "Field exceeds maximum allowed size of {limit} bytes"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Multipart upload: `file`, `title`, `description`
pub async fn upload_file<R>(
    mut payload: Multipart,
    req: HttpRequest,
    service: web::Data<UploadService<R>>,
) -> Result<Success<UploadEntity>, error::Error>
where
    R: UploadRepository + Send + Sync + 'static,
{
    let owner_id = get_claims(&req)?.sub;

    let mut form = UploadForm::default();
    let mut file: Option<IncomingFile> = None;

    while let Some(mut field) =
        payload.try_next().await.map_err(|e| error::Error::bad_request(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .ok_or_else(|| error::Error::bad_request("Missing filename"))?
                    .to_string();
                let declared = field.content_type().map(|m| m.to_string());
                let mime_type = UploadService::<R>::resolve_mime_type(&filename, declared);
                let bytes = read_field(&mut field, service.max_file_size()).await?;
                file = Some(IncomingFile { filename, mime_type, bytes });
            }
            "title" | "description" => {
                let value = String::from_utf8(read_field(&mut field, MAX_TEXT_FIELD_SIZE).await?)
                    .map_err(|_| error::Error::bad_request("Text fields must be UTF-8"))?;
                if name == "title" {
                    form.title = value.trim().to_string();
                } else {
                    form.description = value.trim().to_string();
                }
            }
            _ => {
                // drain unknown parts
                read_field(&mut field, MAX_TEXT_FIELD_SIZE).await?;
            }
        }
    }

    form.validate().map_err(|e| error::Error::bad_request(e.to_string()))?;
    let file = file.ok_or_else(|| error::Error::bad_request("No file found in request"))?;

    let upload =
        service.upload(owner_id, form, file.filename, file.mime_type, file.bytes).await?;

    Ok(Success::created(Some(upload)).message("File uploaded successfully"))
}

pub async fn list_my_uploads<R>(
    req: HttpRequest,
    service: web::Data<UploadService<R>>,
) -> Result<Success<Vec<UploadEntity>>, error::Error>
where
    R: UploadRepository + Send + Sync + 'static,
{
    let owner_id = get_claims(&req)?.sub;
    let uploads = service.list_mine(owner_id).await?;
    Ok(Success::ok(Some(uploads)).message("User uploads retrieved successfully"))
}

pub async fn delete_upload<R>(
    upload_id: web::Path<Uuid>,
    req: HttpRequest,
    service: web::Data<UploadService<R>>,
) -> Result<Success<()>, error::Error>
where
    R: UploadRepository + Send + Sync + 'static,
{
    let owner_id = get_claims(&req)?.sub;
    service.delete(upload_id.into_inner(), owner_id).await?;
    Ok(Success::no_content())
}
