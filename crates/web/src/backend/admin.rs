//! Back-office endpoints. Every call needs an admin token.

use foodio_core::validation::MenuItemDraft;
use foodio_core::{CategoryId, MenuItemId, OrderId, OrderStatus};
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use secrecy::SecretString;
use tracing::instrument;

use super::{
    ApiCategory, ApiMenuItem, ApiOrder, BackendClient, BackendError, CreateCategoryRequest,
    ImageUpload, MenuItemUpdate, StatusUpdateRequest,
};

impl BackendClient {
    /// List every menu item, available or not.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn admin_menu(&self, token: &SecretString) -> Result<Vec<ApiMenuItem>, BackendError> {
        self.get("/admin/menu", Some(token)).await
    }

    /// Create a menu item. The backend marks new items available.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, token, image), fields(name = %draft.name))]
    pub async fn create_menu_item(
        &self,
        token: &SecretString,
        draft: &MenuItemDraft,
        image: Option<ImageUpload>,
    ) -> Result<(), BackendError> {
        let form = Form::new()
            .text("name", draft.name.clone())
            .text("price", draft.price.to_string())
            .text("categoryName", draft.category.clone())
            .text("description", draft.description.clone());
        let form = attach_image(form, image)?;

        self.send_multipart(Method::POST, "/admin/menu", token, form)
            .await
    }

    /// Replace a menu item's fields, optionally swapping or dropping its image.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, token, draft, update))]
    pub async fn update_menu_item(
        &self,
        token: &SecretString,
        id: MenuItemId,
        draft: &MenuItemDraft,
        update: MenuItemUpdate,
    ) -> Result<(), BackendError> {
        let mut form = Form::new()
            .text("name", draft.name.clone())
            .text("price", draft.price.to_string())
            .text("category", draft.category.clone())
            .text("description", draft.description.clone())
            .text("availableForOrder", update.available.to_string());
        if update.remove_image {
            form = form.text("removeImage", "true");
        }
        let form = attach_image(form, update.image)?;

        let path = format!("/admin/updatemenuitem/{id}");
        self.send_multipart(Method::PATCH, &path, token, form).await
    }

    /// Delete a menu item.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn delete_menu_item(
        &self,
        token: &SecretString,
        id: MenuItemId,
    ) -> Result<(), BackendError> {
        self.delete(&format!("/admin/menuitem/{id}"), token).await
    }

    /// List categories.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn admin_categories(
        &self,
        token: &SecretString,
    ) -> Result<Vec<ApiCategory>, BackendError> {
        self.get("/admin/categories", Some(token)).await
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn create_category(&self, token: &SecretString, name: &str) -> Result<(), BackendError> {
        self.send_json_unit(
            Method::POST,
            "/admin/categories",
            Some(token),
            &CreateCategoryRequest { name },
        )
        .await
    }

    /// Delete a category. Items still pointing at it are left alone.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn delete_category(
        &self,
        token: &SecretString,
        id: CategoryId,
    ) -> Result<(), BackendError> {
        self.delete(&format!("/admin/deletecategory/{id}"), token)
            .await
    }

    /// List every order.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn admin_orders(&self, token: &SecretString) -> Result<Vec<ApiOrder>, BackendError> {
        self.get("/admin/orders", Some(token)).await
    }

    /// Set an order's status.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn update_order_status(
        &self,
        token: &SecretString,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), BackendError> {
        let path = format!("/admin/order/status/{id}");
        self.send_json_unit(
            Method::PATCH,
            &path,
            Some(token),
            &StatusUpdateRequest { status },
        )
        .await
    }
}

fn attach_image(form: Form, image: Option<ImageUpload>) -> Result<Form, BackendError> {
    let Some(image) = image else {
        return Ok(form);
    };
    let part = Part::bytes(image.bytes)
        .file_name(image.file_name)
        .mime_str(&image.content_type)?;
    Ok(form.part("image", part))
}
