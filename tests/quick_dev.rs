use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use serde_json::json;
use uuid::Uuid;

fn unique(prefix: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis();
    format!("{prefix}_{millis}")
}

// Smoke test against a locally running server:
// `cargo run`, then `cargo test quick_dev -- --ignored --nocapture`.
// The clients follow redirects, so a 303 to a detail page shows up here as
// the final status of that page.
#[tokio::test]
#[ignore]
async fn quick_dev() -> Result<()> {
    let author = httpc_test::new_client("http://localhost:8080")?;
    let visitor = httpc_test::new_client("http://localhost:8080")?;
    let anon = httpc_test::new_client("http://localhost:8080")?;

    let author_name = unique("ada");
    let visitor_name = unique("bob");

    for (client, name) in [(&author, &author_name), (&visitor, &visitor_name)] {
        client
            .do_post(
                "/registration/",
                json!({
                  "username": name,
                  "email": format!("{name}@example.com"),
                  "password": "123456",
                  "passwordConfirm": "123456",
                }),
            )
            .await?
            .print()
            .await?;

        client
            .do_post(
                "/auth/login",
                json!({
                  "username": name,
                  "password": "123456",
                }),
            )
            .await?
            .print()
            .await?;
    }

    // A hidden post is a 404 for everyone but its author.
    let res = author
        .do_post(
            "/posts/create/",
            json!({
              "title": "Draft notes",
              "text": "Not ready yet.",
              "is_published": false,
            }),
        )
        .await?;
    let id_hidden = res.json_body()?["posts"]["items"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    assert_eq!(
        anon.do_get(&format!("/posts/{id_hidden}/"))
            .await?
            .status()
            .as_u16(),
        404
    );
    assert_eq!(
        visitor
            .do_get(&format!("/posts/{id_hidden}/"))
            .await?
            .status()
            .as_u16(),
        404
    );
    assert_eq!(
        author
            .do_get(&format!("/posts/{id_hidden}/"))
            .await?
            .status()
            .as_u16(),
        200
    );

    // A public post for the edit and comment flows.
    let res = author
        .do_post(
            "/posts/create/",
            json!({
              "title": "Hello from the road",
              "text": "First post from the new backend.",
            }),
        )
        .await?;
    let id_public = res.json_body()?["posts"]["items"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // A foreign edit lands back on the detail page and changes nothing,
    // whether or not the payload validates.
    let res = visitor
        .do_post(
            &format!("/posts/{id_public}/edit/"),
            json!({ "title": "Hijacked" }),
        )
        .await?;
    assert_eq!(res.status().as_u16(), 200);

    let res = visitor
        .do_post(&format!("/posts/{id_public}/edit/"), json!({ "title": "" }))
        .await?;
    assert_ne!(res.status().as_u16(), 400);

    let detail = anon
        .do_get(&format!("/posts/{id_public}/"))
        .await?
        .json_body()?;
    assert_eq!(detail["post"]["title"], "Hello from the road");

    // Editing a post that does not exist is a 404 even with a bad payload.
    let res = visitor
        .do_post(
            &format!("/posts/{}/edit/", Uuid::now_v7()),
            json!({ "title": "" }),
        )
        .await?;
    assert_eq!(res.status().as_u16(), 404);

    // A valid comment lands on the post; the redirect ends on the detail page.
    let res = visitor
        .do_post(
            &format!("/posts/{id_public}/comment/"),
            json!({ "text": "Nice one!" }),
        )
        .await?;
    assert_eq!(res.status().as_u16(), 200);
    let detail = res.json_body()?;
    assert_eq!(detail["comments"][0]["text"], "Nice one!");

    // An invalid comment is swallowed, but only on a post that exists.
    let res = visitor
        .do_post(&format!("/posts/{id_public}/comment/"), json!({ "text": "" }))
        .await?;
    assert_ne!(res.status().as_u16(), 400);

    let res = visitor
        .do_post(
            &format!("/posts/{}/comment/", Uuid::now_v7()),
            json!({ "text": "" }),
        )
        .await?;
    assert_eq!(res.status().as_u16(), 404);

    author.do_get("/").await?.print().await?;
    author
        .do_get(&format!("/profile/{author_name}/"))
        .await?
        .print()
        .await?;

    Ok(())
}
