use std::collections::HashMap;
use std::io::Read as _;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

/// A request the stub received.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Hit {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

/// Serves canned bodies under `/api/v1`. Unknown routes get a failure envelope.
pub struct ApiStub {
    pub base_url: String,
    hits: Arc<Mutex<Vec<Hit>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

#[allow(dead_code)]
impl ApiStub {
    /// `routes` maps `"GET /weekly"` style keys to `(status, body)`.
    pub fn spawn(routes: &[(&str, u16, String)]) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start api stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}/api/v1");

        let routes = routes
            .iter()
            .map(|(key, status, body)| ((*key).to_owned(), (*status, body.clone())))
            .collect::<HashMap<_, _>>();
        let hits = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&hits);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let mut request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let method = request.method().to_string();
                let path = request.url().to_string();
                let authorization = request
                    .headers()
                    .iter()
                    .find(|header| header.field.equiv("Authorization"))
                    .map(|header| header.value.to_string());
                seen.lock().unwrap().push(Hit {
                    method: method.clone(),
                    path: path.clone(),
                    authorization,
                    body,
                });

                let relative = path.strip_prefix("/api/v1").unwrap_or(&path);
                let (status, body) = routes
                    .get(&format!("{method} {relative}"))
                    .cloned()
                    .unwrap_or_else(|| {
                        (
                            404,
                            r#"{"success":false,"error":{"message":"not found"}}"#.to_owned(),
                        )
                    });

                let header =
                    tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                        .expect("build header");
                let response = tiny_http::Response::from_string(body)
                    .with_status_code(status)
                    .with_header(header);
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            hits,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hit_count(&self, path: &str) -> usize {
        let full = format!("/api/v1{path}");
        self.hits().iter().filter(|hit| hit.path == full).count()
    }
}

impl Drop for ApiStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[allow(dead_code)]
pub fn success(data: serde_json::Value) -> String {
    serde_json::json!({ "success": true, "data": data }).to_string()
}

#[allow(dead_code)]
pub fn basic_recipe_json(id: &str, short: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "short": short,
        "title": "Spicy Tomato Soup",
        "image": "https://example.com/soup.png",
        "nutrients": ["Fiber", "Vitamin C"],
        "timeToCook": 45,
        "servings": 4,
        "gradient": ["#d3a972", "#e8a16e"]
    })
}

#[allow(dead_code)]
pub fn recipe_json(id: &str, short: &str) -> serde_json::Value {
    let mut recipe = basic_recipe_json(id, short);
    let extra = serde_json::json!({
        "ingredients": ["2 tomatoes", "1 chilli"],
        "method": {
            "steps": [{
                "title": "Cook",
                "substeps": [{
                    "content": "Simmer for **30 minutes**.",
                    "warnings": [{ "title": "Hot", "content": "Mind the steam." }]
                }]
            }]
        },
        "quiz": {
            "questions": [
                {
                    "question": "Is a tomato a fruit?",
                    "correctAnswers": ["Yes"],
                    "wrongAnswers": ["No"],
                    "reward": 40
                },
                {
                    "question": "How long does it simmer?",
                    "correctAnswers": ["30 minutes"],
                    "wrongAnswers": ["5 minutes"],
                    "reward": 35
                }
            ],
            "allCorrectReward": 50
        }
    });
    if let (Some(target), Some(extra)) = (recipe.as_object_mut(), extra.as_object()) {
        for (key, value) in extra {
            target.insert(key.clone(), value.clone());
        }
    }
    recipe
}
