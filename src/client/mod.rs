//! Typed HTTP client for the meals and diets services.
//!
//! All calls are sequential awaits over a shared [`reqwest::Client`]; the
//! harness never issues concurrent requests. A non-2xx response with a
//! sentinel body is an expected protocol outcome and is returned inside
//! [`CreateOutcome`] / [`Lookup`] rather than as an `Err` - only transport
//! faults and contract violations surface as [`HarnessError`].

mod types;

pub use types::{Diet, Dish, Meal, NewDiet, NewDish, NewMeal};

use std::collections::HashMap;
use std::time::Duration;

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::HarnessConfig;
use crate::error::{ApiRejection, HarnessError};

/// Result of a creation request.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// Server accepted the resource. `id` is absent when the service does
    /// not echo an integer id (the diets service only returns 201).
    Created { id: Option<i64>, status: u16 },
    /// Server rejected the resource with a sentinel body.
    Rejected {
        status: u16,
        rejection: ApiRejection,
    },
}

impl CreateOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, CreateOutcome::Created { .. })
    }
}

/// Result of a lookup request.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    Missing {
        status: u16,
        rejection: ApiRejection,
    },
}

/// Whether a creation endpoint is required to echo an integer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdPolicy {
    Required,
    Optional,
}

/// Client bound to one meals service and one diets service.
pub struct ApiClient {
    http: reqwest::Client,
    meals_base: String,
    diets_base: String,
}

impl ApiClient {
    /// Build a client from harness configuration.
    pub fn new(config: &HarnessConfig) -> Result<Self, HarnessError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.http.timeout_ms))
            .build()
            .map_err(|err| HarnessError::Transport {
                context: "building HTTP client".to_string(),
                details: err.to_string(),
            })?;

        Ok(Self {
            http,
            meals_base: trim_base(&config.endpoints.meals_base),
            diets_base: trim_base(&config.endpoints.diets_base),
        })
    }

    pub fn meals_base(&self) -> &str {
        &self.meals_base
    }

    pub fn diets_base(&self) -> &str {
        &self.diets_base
    }

    /// POST /dishes with `{name}`. 201 echoes the new dish id.
    pub async fn create_dish(&self, name: &str) -> Result<CreateOutcome, HarnessError> {
        let url = format!("{}/dishes", self.meals_base);
        self.post_resource(
            &url,
            &NewDish {
                name: name.to_string(),
            },
            IdPolicy::Required,
        )
        .await
    }

    /// POST /meals. 201 echoes the new meal id.
    pub async fn create_meal(&self, meal: &NewMeal) -> Result<CreateOutcome, HarnessError> {
        let url = format!("{}/meals", self.meals_base);
        self.post_resource(&url, meal, IdPolicy::Required).await
    }

    /// POST /diets. Success is 201; the body may or may not carry an id.
    pub async fn create_diet(&self, diet: &NewDiet) -> Result<CreateOutcome, HarnessError> {
        let url = format!("{}/diets", self.diets_base);
        self.post_resource(&url, diet, IdPolicy::Optional).await
    }

    /// GET /dishes/{id|name}.
    pub async fn get_dish(&self, key: &str) -> Result<Lookup<Dish>, HarnessError> {
        let url = keyed_url(&self.meals_base, "dishes", key)?;
        self.get_resource(url.as_str()).await
    }

    /// GET /dishes. The collection is keyed by server-assigned id.
    pub async fn list_dishes(&self) -> Result<HashMap<String, Dish>, HarnessError> {
        let url = format!("{}/dishes", self.meals_base);
        self.get_collection(&url).await
    }

    /// GET /meals/{id|name}.
    pub async fn get_meal(&self, key: &str) -> Result<Lookup<Meal>, HarnessError> {
        let url = keyed_url(&self.meals_base, "meals", key)?;
        self.get_resource(url.as_str()).await
    }

    /// GET /meals, optionally filtered to meals satisfying a diet's
    /// thresholds via `?diet=Name`.
    pub async fn list_meals(
        &self,
        diet: Option<&str>,
    ) -> Result<HashMap<String, Meal>, HarnessError> {
        let mut url = parse_url(&format!("{}/meals", self.meals_base))?;
        if let Some(name) = diet {
            url.query_pairs_mut().append_pair("diet", name);
        }
        self.get_collection(url.as_str()).await
    }

    /// GET /diets/{name}.
    pub async fn get_diet(&self, name: &str) -> Result<Lookup<Diet>, HarnessError> {
        let url = keyed_url(&self.diets_base, "diets", name)?;
        self.get_resource(url.as_str()).await
    }

    /// GET /diets.
    pub async fn list_diets(&self) -> Result<HashMap<String, Diet>, HarnessError> {
        let url = format!("{}/diets", self.diets_base);
        self.get_collection(&url).await
    }

    async fn post_resource<T: Serialize>(
        &self,
        url: &str,
        payload: &T,
        id_policy: IdPolicy,
    ) -> Result<CreateOutcome, HarnessError> {
        let response = self.http.post(url).json(payload).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("POST {} => {} {:?}", url, status.as_u16(), body.trim());

        if !status.is_success() {
            return Ok(CreateOutcome::Rejected {
                status: status.as_u16(),
                rejection: ApiRejection::from_parts(status.as_u16(), &body),
            });
        }

        let id = match (body.trim().parse::<i64>(), id_policy) {
            (Ok(id), _) => Some(id),
            (Err(_), IdPolicy::Optional) => None,
            (Err(_), IdPolicy::Required) => {
                return Err(HarnessError::MalformedResponse {
                    context: format!("POST {}", url),
                    details: format!("expected integer id in 2xx body, got {:?}", body.trim()),
                })
            }
        };

        Ok(CreateOutcome::Created {
            id,
            status: status.as_u16(),
        })
    }

    async fn get_resource<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Lookup<T>, HarnessError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("GET {} => {}", url, status.as_u16());

        if !status.is_success() {
            return Ok(Lookup::Missing {
                status: status.as_u16(),
                rejection: ApiRejection::from_parts(status.as_u16(), &body),
            });
        }

        let value = serde_json::from_str(&body).map_err(|err| HarnessError::MalformedResponse {
            context: format!("GET {}", url),
            details: err.to_string(),
        })?;
        Ok(Lookup::Found(value))
    }

    async fn get_collection<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<HashMap<String, T>, HarnessError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("GET {} => {}", url, status.as_u16());

        if !status.is_success() {
            return Err(HarnessError::MalformedResponse {
                context: format!("GET {}", url),
                details: format!("expected 200 for collection, got {}", status.as_u16()),
            });
        }

        serde_json::from_str(&body).map_err(|err| HarnessError::MalformedResponse {
            context: format!("GET {}", url),
            details: err.to_string(),
        })
    }
}

fn trim_base(base: &str) -> String {
    base.trim_end_matches('/').to_string()
}

fn parse_url(raw: &str) -> Result<reqwest::Url, HarnessError> {
    reqwest::Url::parse(raw).map_err(|err| HarnessError::Transport {
        context: format!("building URL from {raw}"),
        details: err.to_string(),
    })
}

/// Builds `{base}/{collection}/{key}` with the key percent-encoded as a
/// single path segment, so names carrying `#`, `?`, or `/` survive intact.
fn keyed_url(base: &str, collection: &str, key: &str) -> Result<reqwest::Url, HarnessError> {
    let mut url = parse_url(base)?;
    url.path_segments_mut()
        .map_err(|_| HarnessError::Transport {
            context: format!("building URL from {base}"),
            details: "base URL cannot carry path segments".to_string(),
        })?
        .pop_if_empty()
        .push(collection)
        .push(key);
    Ok(url)
}
