//! Sign-in, registration and customer endpoints.

use foodio_core::validation::{Credentials, Registration};
use reqwest::Method;
use secrecy::SecretString;
use tracing::instrument;

use super::{
    ApiMenuItem, ApiOrder, BackendClient, BackendError, LoginRequest, LoginResponse,
    PlaceOrderRequest, RegisterRequest,
};

impl BackendClient {
    /// Exchange credentials for a token and user record.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unauthorized`] for bad credentials, or any
    /// other error if the request fails.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, BackendError> {
        let body = LoginRequest {
            email: credentials.email.as_str(),
            password: &credentials.password,
        };
        self.send_json(Method::POST, "/auth/login", None, &body)
            .await
    }

    /// Create a customer account.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<(), BackendError> {
        let body = RegisterRequest {
            name: &registration.full_name,
            email: registration.email.as_str(),
            address: &registration.address,
            password: &registration.password,
        };
        self.send_json_unit(Method::POST, "/auth/register", None, &body)
            .await
    }

    /// The menu as customers see it. Works without a token.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn user_menu(
        &self,
        token: Option<&SecretString>,
    ) -> Result<Vec<ApiMenuItem>, BackendError> {
        self.get("/user/menu", token).await
    }

    /// Place an order for the signed-in customer.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, token, order), fields(lines = order.items.len()))]
    pub async fn place_order(
        &self,
        token: &SecretString,
        order: &PlaceOrderRequest,
    ) -> Result<(), BackendError> {
        self.send_json_unit(Method::POST, "/user/placeorder", Some(token), order)
            .await
    }

    /// The signed-in customer's orders.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn my_orders(&self, token: &SecretString) -> Result<Vec<ApiOrder>, BackendError> {
        self.get("/user/orders", Some(token)).await
    }
}
