//! Service descriptor at `/`.

use std::collections::BTreeMap;

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ServiceDescriptor {
    pub message: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

pub async fn home() -> Json<ServiceDescriptor> {
    Json(ServiceDescriptor {
        message: "Backend API is running",
        endpoints: BTreeMap::from([
            ("/health", "Health check"),
            ("/users", "Get all users"),
            ("/users/<id>", "Get user by ID"),
            ("/crash", "Endpoint that causes a crash (DANGEROUS!)"),
        ]),
    })
}
