mod api_stub;

use api_stub::{ApiStub, basic_recipe_json, recipe_json, success};
use recipebook::api::{ApiClient, HttpTransport};
use recipebook::config::normalize_base_url;
use recipebook::error::ApiError;
use recipebook::recipe::{RecipeId, RecipeService};

fn service(stub: &ApiStub) -> anyhow::Result<RecipeService> {
    let base_url = normalize_base_url(&stub.base_url)?;
    Ok(RecipeService::new(ApiClient::new(base_url, HttpTransport::new())))
}

#[tokio::test]
async fn recipes_are_fetched_once_then_served_from_memory() -> anyhow::Result<()> {
    let stub = ApiStub::spawn(&[
        ("GET /recipe/id/r1", 200, success(recipe_json("r1", "spicy-tomato-soup"))),
        ("GET /recipe/short/other", 200, success(recipe_json("r2", "other"))),
    ]);
    let service = service(&stub)?;

    let first = service.get_by_id(&RecipeId::from("r1")).await?;
    let second = service.get_by_id(&RecipeId::from("r1")).await?;
    assert_eq!(first, second);
    assert_eq!(first.basic.title, "Spicy Tomato Soup");
    assert_eq!(first.method.steps[0].substeps[0].warnings[0].title, "Hot");
    assert_eq!(stub.hit_count("/recipe/id/r1"), 1);

    // Fetching by id also fills the by-short cache.
    let by_short = service.get_by_short("spicy-tomato-soup").await?;
    assert_eq!(by_short.id().as_str(), "r1");
    assert_eq!(stub.hits().len(), 1);

    service.get_by_short("other").await?;
    service.get_by_id(&RecipeId::from("r2")).await?;
    assert_eq!(stub.hit_count("/recipe/short/other"), 1);
    assert_eq!(stub.hits().len(), 2);
    assert_eq!(service.cached_len(), 2);
    Ok(())
}

#[tokio::test]
async fn basic_recipes_are_memoized_and_weekly_is_not() -> anyhow::Result<()> {
    let stub = ApiStub::spawn(&[
        ("GET /recipe-basic/id/b1", 200, success(basic_recipe_json("b1", "soup"))),
        ("GET /weekly", 200, success(basic_recipe_json("w1", "weekly-soup"))),
    ]);
    let service = service(&stub)?;

    let basic = service.get_basic(&RecipeId::from("b1")).await?;
    service.get_basic(&RecipeId::from("b1")).await?;
    assert_eq!(basic.url(), "/recipe/soup");
    assert_eq!(basic.time_string(), "45 mins");
    assert_eq!(stub.hit_count("/recipe-basic/id/b1"), 1);

    let weekly = service.weekly().await?;
    service.weekly().await?;
    assert_eq!(weekly.id.as_str(), "w1");
    assert_eq!(stub.hit_count("/weekly"), 2);
    Ok(())
}

#[tokio::test]
async fn failure_envelope_surfaces_server_message_and_is_not_cached() -> anyhow::Result<()> {
    let stub = ApiStub::spawn(&[(
        "GET /recipe/id/missing",
        404,
        r#"{"success":false,"error":{"message":"x","data":{"id":"missing"}}}"#.to_owned(),
    )]);
    let service = service(&stub)?;

    for _ in 0..2 {
        let err = service
            .get_by_id(&RecipeId::from("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Api { .. }), "err={err:?}");
        assert_eq!(err.message(), Some("x"));
        assert_eq!(err.data(), Some(&serde_json::json!({ "id": "missing" })));
    }
    assert_eq!(stub.hit_count("/recipe/id/missing"), 2);
    assert_eq!(service.cached_len(), 0);
    Ok(())
}

#[tokio::test]
async fn non_json_response_keeps_raw_text() -> anyhow::Result<()> {
    let stub = ApiStub::spawn(&[("GET /weekly", 502, "Bad Gateway".to_owned())]);
    let service = service(&stub)?;

    match service.weekly().await {
        Err(ApiError::InvalidResponse { raw, .. }) => assert_eq!(raw, "Bad Gateway"),
        other => panic!("expected invalid response, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() -> anyhow::Result<()> {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        listener.local_addr()?
    };
    let base_url = normalize_base_url(&format!("http://{addr}/api/v1"))?;
    let service = RecipeService::new(ApiClient::new(base_url, HttpTransport::new()));

    let err = service.weekly().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport { .. }), "err={err:?}");
    Ok(())
}

#[tokio::test]
async fn ids_are_escaped_into_a_single_segment() -> anyhow::Result<()> {
    let stub = ApiStub::spawn(&[]);
    let service = service(&stub)?;

    let _ = service.get_by_id(&RecipeId::from("a/b c")).await;
    let hits = stub.hits();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].path, "/api/v1/recipe/id/a%2Fb%20c");
    Ok(())
}

#[tokio::test]
async fn publish_posts_with_bearer_token_and_caches_result() -> anyhow::Result<()> {
    let mut stored = recipe_json("p1", "published-soup");
    if let Some(fields) = stored.as_object_mut() {
        // The server answers with its database document, keyed by `_id`.
        let id = fields.remove("id").unwrap_or_default();
        fields.insert("_id".to_owned(), id);
    }
    let stub = ApiStub::spawn(&[("POST /recipe", 200, success(stored))]);
    let service = service(&stub)?;

    let draft: recipebook::recipe::Recipe =
        serde_json::from_value(recipe_json("p1", "published-soup"))?;
    let published = service.publish(&draft, "staff-token").await?;
    assert_eq!(published.short(), "published-soup");
    assert_eq!(published.id().as_str(), "p1");

    let hits = stub.hits();
    assert_eq!(hits[0].method, "POST");
    assert_eq!(hits[0].authorization.as_deref(), Some("Bearer staff-token"));
    let sent: serde_json::Value = serde_json::from_str(&hits[0].body)?;
    assert_eq!(sent["uuid"], "p1");
    assert!(sent.get("id").is_none());
    assert_eq!(sent["timeToCook"], 45);
    assert_eq!(sent["quiz"]["allCorrectReward"], 50);

    service.get_by_short("published-soup").await?;
    assert_eq!(stub.hits().len(), 1);
    Ok(())
}
