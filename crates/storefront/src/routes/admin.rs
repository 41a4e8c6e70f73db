//! Admin panel route handlers.
//!
//! Any signed-in visitor may use the panel; the marketplace decides what
//! the token is allowed to do.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use digishelf_core::{NewProduct, ProductId};

use super::NavView;
use crate::api::FileUpload;
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Largest accepted product file.
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Multipart field holding the product file.
const FILE_FIELD: &str = "file";

// =============================================================================
// Form Types
// =============================================================================

/// Create product form data.
#[derive(Debug, Deserialize)]
pub struct CreateProductForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: String,
    #[serde(default)]
    pub cover_image_url: String,
}

/// Query parameters for the admin page.
#[derive(Debug, Default, Deserialize)]
pub struct AdminQuery {
    /// Product to attach a file to.
    pub product: Option<ProductId>,
}

// =============================================================================
// Templates
// =============================================================================

/// Outcome of an admin action.
#[derive(Clone)]
pub struct Notice {
    pub ok: bool,
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Admin panel template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/index.html")]
pub struct AdminTemplate {
    pub nav: NavView,
    /// Product the upload form targets.
    pub upload_target: Option<ProductId>,
    pub create_notice: Option<Notice>,
    pub upload_notice: Option<Notice>,
}

impl AdminTemplate {
    fn new(auth: &RequireAuth, upload_target: Option<ProductId>) -> Self {
        Self {
            nav: NavView {
                email: Some(auth.0.email.to_string()),
            },
            upload_target,
            create_notice: None,
            upload_notice: None,
        }
    }
}

// =============================================================================
// Routes
// =============================================================================

/// Display the admin panel.
pub async fn index(auth: RequireAuth, Query(query): Query<AdminQuery>) -> impl IntoResponse {
    AdminTemplate::new(&auth, query.product)
}

/// Create a product.
///
/// On success the upload form targets the new product.
#[instrument(skip(state, auth))]
pub async fn create_product(
    State(state): State<AppState>,
    auth: RequireAuth,
    Form(form): Form<CreateProductForm>,
) -> impl IntoResponse {
    let new_product = match NewProduct::from_form(
        &form.title,
        &form.description,
        &form.price,
        &form.cover_image_url,
    ) {
        Ok(product) => product,
        Err(err) => {
            let mut page = AdminTemplate::new(&auth, None);
            page.create_notice = Some(Notice::failure(err.to_string()));
            return page;
        }
    };

    match state
        .api()
        .create_product(&auth.0.bearer(), &new_product)
        .await
    {
        Ok(created) => {
            tracing::info!(product_id = %created.id, "Product created");
            let mut page = AdminTemplate::new(&auth, Some(created.id));
            page.create_notice = Some(Notice::success(format!(
                "Created product #{}",
                created.id
            )));
            page
        }
        Err(err) => {
            tracing::warn!("Failed to create product: {err}");
            let mut page = AdminTemplate::new(&auth, None);
            page.create_notice = Some(Notice::failure("Failed to create product"));
            page
        }
    }
}

/// Attach a file to a product.
#[instrument(skip(state, auth, multipart))]
pub async fn upload_file(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(product_id): Path<ProductId>,
    multipart: Multipart,
) -> Result<AdminTemplate, AppError> {
    let mut page = AdminTemplate::new(&auth, Some(product_id));

    let Some(file) = read_file_field(multipart).await? else {
        page.upload_notice = Some(Notice::failure("Choose a file to upload"));
        return Ok(page);
    };

    page.upload_notice = Some(
        match state
            .api()
            .upload_product_file(&auth.0.bearer(), product_id, file)
            .await
        {
            Ok(uploaded) => {
                tracing::info!(%product_id, file_path = %uploaded.file_path, "Product file uploaded");
                Notice::success(format!("Uploaded to {}", uploaded.file_path))
            }
            Err(err) => {
                tracing::warn!("Failed to upload product file: {err}");
                Notice::failure("Upload failed")
            }
        },
    );

    Ok(page)
}

/// Pull the `file` field out of a multipart body. A field without a file
/// name is an empty file input.
async fn read_file_field(mut multipart: Multipart) -> Result<Option<FileUpload>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return Ok(None);
        }
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        return Ok(Some(FileUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        }));
    }

    Ok(None)
}
