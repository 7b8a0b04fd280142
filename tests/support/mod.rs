//! In-process stub of the meals/diets services for integration tests.
//!
//! Implements just enough of the external contract to exercise the
//! harness: sentinel bodies alongside non-2xx statuses, id echo on
//! creation, id-keyed collections, and the diet filter on /meals. The
//! nutrition table is fixed so expectations stay literal.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Map, Value};

/// Nutrition assigned to recognized dish names: (cal, sodium, sugar).
/// `None` fields simulate a deployment that omits a computed value.
fn nutrition(name: &str) -> Option<(Option<f64>, Option<f64>, Option<f64>)> {
    let full = |cal: f64, sodium: f64, sugar: f64| {
        Some((Some(cal), Some(sodium), Some(sugar)))
    };
    match name {
        "orange" => full(47.0, 1.0, 9.0),
        "spaghetti" => full(158.0, 1.0, 0.56),
        "apple pie" => full(237.0, 201.0, 19.0),
        "100g Chicken Breast" => full(165.0, 74.0, 0.0),
        "100g Salmon" => full(208.0, 59.0, 0.0),
        "100g Beef" => full(250.0, 72.0, 0.0),
        "100g Pork" => full(242.0, 62.0, 0.0),
        "100g Tofu" => full(76.0, 7.0, 0.6),
        "200g Broccoli" => full(68.0, 66.0, 3.4),
        "200g Carrots" => full(82.0, 138.0, 9.4),
        "200g Spinach" => full(46.0, 158.0, 0.8),
        "150g Rice" => full(195.0, 2.0, 0.1),
        "150g Pasta" => full(236.0, 2.0, 0.9),
        "150g Potatoes" => full(130.0, 9.0, 1.2),
        "150g Vanilla Ice Cream" => full(311.0, 120.0, 31.8),
        "150g Chocolate Ice Cream" => full(324.0, 114.0, 33.8),
        "150g Strawberry Ice Cream" => full(288.0, 90.0, 27.0),
        "mac & cheese #1" => full(310.0, 560.0, 7.0),
        // Recognized, but the lookup response omits every nutrition field.
        "mystery stew" => Some((None, None, None)),
        _ => None,
    }
}

#[derive(Debug, Clone)]
struct StoredDish {
    id: i64,
    name: String,
    cal: Option<f64>,
    sodium: Option<f64>,
    sugar: Option<f64>,
}

impl StoredDish {
    fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("id".into(), json!(self.id));
        map.insert("name".into(), json!(self.name));
        if let Some(cal) = self.cal {
            map.insert("cal".into(), json!(cal));
        }
        if let Some(sodium) = self.sodium {
            map.insert("sodium".into(), json!(sodium));
        }
        if let Some(sugar) = self.sugar {
            map.insert("sugar".into(), json!(sugar));
        }
        Value::Object(map)
    }
}

#[derive(Debug, Clone)]
struct StoredMeal {
    id: i64,
    name: String,
    appetizer: i64,
    main: i64,
    dessert: i64,
    cal: f64,
    sodium: f64,
    sugar: f64,
}

impl StoredMeal {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "appetizer": self.appetizer,
            "main": self.main,
            "dessert": self.dessert,
            "cal": self.cal,
            "sodium": self.sodium,
            "sugar": self.sugar,
        })
    }
}

#[derive(Debug, Clone)]
struct StoredDiet {
    id: i64,
    name: String,
    cal: f64,
    sodium: f64,
    sugar: f64,
}

impl StoredDiet {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "cal": self.cal,
            "sodium": self.sodium,
            "sugar": self.sugar,
        })
    }
}

#[derive(Debug, Default)]
struct Store {
    dishes: Vec<StoredDish>,
    meals: Vec<StoredMeal>,
    diets: Vec<StoredDiet>,
}

#[derive(Clone, Default)]
struct StubState(Arc<Mutex<Store>>);

fn sentinel(status: StatusCode, code: i32) -> Response {
    (status, code.to_string()).into_response()
}

async fn post_dish(State(state): State<StubState>, Json(body): Json<Value>) -> Response {
    let Some(name) = body.get("name").and_then(Value::as_str) else {
        return sentinel(StatusCode::UNSUPPORTED_MEDIA_TYPE, -1);
    };
    let Some((cal, sodium, sugar)) = nutrition(name) else {
        return sentinel(StatusCode::UNPROCESSABLE_ENTITY, -3);
    };

    let mut store = state.0.lock().unwrap();
    if store.dishes.iter().any(|d| d.name == name) {
        return sentinel(StatusCode::UNPROCESSABLE_ENTITY, -2);
    }

    let id = store.dishes.len() as i64 + 1;
    store.dishes.push(StoredDish {
        id,
        name: name.to_string(),
        cal,
        sodium,
        sugar,
    });
    (StatusCode::CREATED, id.to_string()).into_response()
}

async fn get_dishes(State(state): State<StubState>) -> Response {
    let store = state.0.lock().unwrap();
    let map: Map<String, Value> = store
        .dishes
        .iter()
        .map(|d| (d.id.to_string(), d.to_json()))
        .collect();
    Json(Value::Object(map)).into_response()
}

async fn get_dish(State(state): State<StubState>, Path(key): Path<String>) -> Response {
    let store = state.0.lock().unwrap();
    let found = match key.parse::<i64>() {
        Ok(id) => store.dishes.iter().find(|d| d.id == id),
        Err(_) => store.dishes.iter().find(|d| d.name == key),
    };
    match found {
        Some(dish) => Json(dish.to_json()).into_response(),
        None => sentinel(StatusCode::NOT_FOUND, -5),
    }
}

async fn post_meal(State(state): State<StubState>, Json(body): Json<Value>) -> Response {
    let name = body.get("name").and_then(Value::as_str);
    let appetizer = body.get("appetizer").and_then(Value::as_i64);
    let main = body.get("main").and_then(Value::as_i64);
    let dessert = body.get("dessert").and_then(Value::as_i64);
    let (Some(name), Some(appetizer), Some(main), Some(dessert)) =
        (name, appetizer, main, dessert)
    else {
        return sentinel(StatusCode::UNSUPPORTED_MEDIA_TYPE, -1);
    };

    let mut store = state.0.lock().unwrap();
    let duplicate = store.meals.iter().any(|m| {
        m.name == name
            || (m.appetizer, m.main, m.dessert) == (appetizer, main, dessert)
    });
    if duplicate {
        return sentinel(StatusCode::UNPROCESSABLE_ENTITY, -2);
    }

    let mut total = (0.0, 0.0, 0.0);
    for reference in [appetizer, main, dessert] {
        let Some(dish) = store.dishes.iter().find(|d| d.id == reference) else {
            return sentinel(StatusCode::UNPROCESSABLE_ENTITY, -6);
        };
        total.0 += dish.cal.unwrap_or(0.0);
        total.1 += dish.sodium.unwrap_or(0.0);
        total.2 += dish.sugar.unwrap_or(0.0);
    }

    let id = store.meals.len() as i64 + 1;
    store.meals.push(StoredMeal {
        id,
        name: name.to_string(),
        appetizer,
        main,
        dessert,
        cal: total.0,
        sodium: total.1,
        sugar: total.2,
    });
    (StatusCode::CREATED, id.to_string()).into_response()
}

async fn get_meals(
    State(state): State<StubState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let store = state.0.lock().unwrap();

    let threshold = match params.get("diet") {
        Some(diet_name) => match store.diets.iter().find(|d| &d.name == diet_name) {
            Some(diet) => Some((diet.cal, diet.sodium, diet.sugar)),
            None => return sentinel(StatusCode::NOT_FOUND, -5),
        },
        None => None,
    };

    let map: Map<String, Value> = store
        .meals
        .iter()
        .filter(|m| match threshold {
            Some((cal, sodium, sugar)) => m.cal <= cal && m.sodium <= sodium && m.sugar <= sugar,
            None => true,
        })
        .map(|m| (m.id.to_string(), m.to_json()))
        .collect();
    Json(Value::Object(map)).into_response()
}

async fn get_meal(State(state): State<StubState>, Path(key): Path<String>) -> Response {
    let store = state.0.lock().unwrap();
    let found = match key.parse::<i64>() {
        Ok(id) => store.meals.iter().find(|m| m.id == id),
        Err(_) => store.meals.iter().find(|m| m.name == key),
    };
    match found {
        Some(meal) => Json(meal.to_json()).into_response(),
        None => sentinel(StatusCode::NOT_FOUND, -5),
    }
}

async fn post_diet(State(state): State<StubState>, Json(body): Json<Value>) -> Response {
    let name = body.get("name").and_then(Value::as_str);
    let cal = body.get("cal").and_then(Value::as_f64);
    let sodium = body.get("sodium").and_then(Value::as_f64);
    let sugar = body.get("sugar").and_then(Value::as_f64);
    let (Some(name), Some(cal), Some(sodium), Some(sugar)) = (name, cal, sodium, sugar) else {
        return sentinel(StatusCode::UNSUPPORTED_MEDIA_TYPE, -1);
    };

    let mut store = state.0.lock().unwrap();
    if store.diets.iter().any(|d| d.name == name) {
        return sentinel(StatusCode::UNPROCESSABLE_ENTITY, -2);
    }

    let id = store.diets.len() as i64 + 1;
    store.diets.push(StoredDiet {
        id,
        name: name.to_string(),
        cal,
        sodium,
        sugar,
    });
    (StatusCode::CREATED, id.to_string()).into_response()
}

async fn get_diets(State(state): State<StubState>) -> Response {
    let store = state.0.lock().unwrap();
    let map: Map<String, Value> = store
        .diets
        .iter()
        .map(|d| (d.id.to_string(), d.to_json()))
        .collect();
    Json(Value::Object(map)).into_response()
}

async fn get_diet(State(state): State<StubState>, Path(name): Path<String>) -> Response {
    let store = state.0.lock().unwrap();
    match store.diets.iter().find(|d| d.name == name) {
        Some(diet) => Json(diet.to_json()).into_response(),
        None => sentinel(StatusCode::NOT_FOUND, -5),
    }
}

fn router() -> Router {
    let state = StubState::default();
    Router::new()
        .route("/dishes", get(get_dishes).post(post_dish))
        .route("/dishes/:key", get(get_dish))
        .route("/meals", get(get_meals).post(post_meal))
        .route("/meals/:key", get(get_meal))
        .route("/diets", get(get_diets).post(post_diet))
        .route("/diets/:name", get(get_diet))
        .with_state(state)
}

/// Handle to a running stub instance.
pub struct StubApi {
    pub addr: SocketAddr,
}

impl StubApi {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Bind the stub on an ephemeral port and serve it in the background.
pub async fn spawn() -> StubApi {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub local addr");
    tokio::spawn(async move {
        axum::serve(listener, router())
            .await
            .expect("serve stub API");
    });
    StubApi { addr }
}
