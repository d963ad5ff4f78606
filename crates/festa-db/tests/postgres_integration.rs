//! Integration tests using testcontainers with Postgres 18.

use chrono::Utc;
use festa_db::{Error, MigrationRunner, store, verify_schema};
use festa_schema::{Attendance, TargetRef, Vote, app_schema};
use rust_decimal::Decimal;
use serde_json::json;
use testcontainers::{ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio_postgres::{Client, NoTls};

async fn create_postgres_container() -> (
    testcontainers::ContainerAsync<Postgres>,
    Client,
) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let container = Postgres::default()
        .with_tag("18")
        .start()
        .await
        .expect("Failed to start Postgres container");

    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(5432).await.unwrap();

    let connection_string = format!(
        "host={} port={} user=postgres password=postgres dbname=postgres",
        host, port
    );

    let (client, connection) = tokio_postgres::connect(&connection_string, NoTls)
        .await
        .expect("Failed to connect to Postgres");

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("Connection error: {}", e);
        }
    });

    (container, client)
}

async fn migrated() -> (testcontainers::ContainerAsync<Postgres>, Client) {
    let (container, mut client) = create_postgres_container().await;
    MigrationRunner::new(&mut client)
        .migrate()
        .await
        .expect("migration chain applies");
    (container, client)
}

async fn seed_user(client: &Client, name: &str) -> i64 {
    let email = format!("{name}@example.com");
    store::users::create_user(
        client,
        store::users::NewUser {
            username: name,
            email: &email,
            password_hash: "hash",
        },
    )
    .await
    .expect("user created")
}

async fn seed_event(client: &Client, owner_id: i64) -> i64 {
    store::events::create_event(
        client,
        owner_id,
        store::events::NewEvent {
            title: "Jazz night",
            description: "Live at the docks",
            date: Utc::now(),
            price: Decimal::new(2500, 2),
            organizer_url: None,
            location_id: None,
        },
    )
    .await
    .expect("event created")
}

async fn rows_targeting(client: &Client, table: &str, kind: &str, id: i64) -> i64 {
    let row = client
        .query_one(
            &format!(
                "SELECT count(*) FROM \"{}\" WHERE target_kind = $1 AND target_id = $2",
                table
            ),
            &[&kind, &id],
        )
        .await
        .unwrap();
    row.get(0)
}

async fn rows_for_event(client: &Client, table: &str, event_id: i64) -> i64 {
    let row = client
        .query_one(
            &format!("SELECT count(*) FROM \"{}\" WHERE event_id = $1", table),
            &[&event_id],
        )
        .await
        .unwrap();
    row.get(0)
}

#[tokio::test]
async fn migration_chain_applies_and_matches_model() {
    let (_container, mut client) = create_postgres_container().await;

    let ran = MigrationRunner::new(&mut client).migrate().await.unwrap();
    assert_eq!(ran.len(), 12);
    assert_eq!(ran[0], "0001-create-user");
    assert_eq!(ran[11], "0012-event-location-set-null");

    // A second run has nothing to do
    let ran = MigrationRunner::new(&mut client).migrate().await.unwrap();
    assert!(ran.is_empty());

    // After the full chain, the live schema is exactly the declared model
    verify_schema(&client, &app_schema()).await.unwrap();
}

#[tokio::test]
async fn reapplying_a_step_is_rejected() {
    let (_container, mut client) = migrated().await;

    let err = MigrationRunner::new(&mut client)
        .apply("0012-event-location-set-null")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyApplied { .. }));
}

#[tokio::test]
async fn skipping_a_dependency_is_rejected() {
    let (_container, mut client) = create_postgres_container().await;

    let err = MigrationRunner::new(&mut client)
        .apply("0002-create-event")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::MissingDependency { version, .. } if version == "0002-create-event"
    ));
}

#[tokio::test]
async fn username_and_email_are_unique() {
    let (_container, client) = migrated().await;
    seed_user(&client, "ada").await;

    let err = store::users::create_user(
        &client,
        store::users::NewUser {
            username: "ada",
            email: "other@example.com",
            password_hash: "hash",
        },
    )
    .await
    .unwrap_err();
    assert!(err.is_duplicate());

    let err = store::users::create_user(
        &client,
        store::users::NewUser {
            username: "ada2",
            email: "ada@example.com",
            password_hash: "hash",
        },
    )
    .await
    .unwrap_err();
    assert!(err.is_duplicate());
}

#[tokio::test]
async fn one_attendance_and_one_share_per_owner_event() {
    let (_container, client) = migrated().await;
    let owner = seed_user(&client, "owner").await;
    let guest = seed_user(&client, "guest").await;
    let event = seed_event(&client, owner).await;

    // A repeat declaration replaces the status instead of adding a row
    store::attendance::set_attendance(&client, guest, event, Attendance::Yes)
        .await
        .unwrap();
    store::attendance::set_attendance(&client, guest, event, Attendance::Maybe)
        .await
        .unwrap();
    assert_eq!(
        store::attendance::attendance_of(&client, guest, event)
            .await
            .unwrap(),
        Some(Attendance::Maybe)
    );
    assert_eq!(rows_for_event(&client, "attendance", event).await, 1);

    store::attendance::share_event(&client, guest, event)
        .await
        .unwrap();
    let err = store::attendance::share_event(&client, guest, event)
        .await
        .unwrap_err();
    assert!(err.is_duplicate());
    assert_eq!(rows_for_event(&client, "share", event).await, 1);
}

#[tokio::test]
async fn follow_is_unique_and_maintains_the_counter() {
    let (_container, mut client) = migrated().await;
    let owner = seed_user(&client, "owner").await;
    let fan = seed_user(&client, "fan").await;
    let event = seed_event(&client, owner).await;

    let count = store::follows::follow(&mut client, fan, TargetRef::event(event))
        .await
        .unwrap();
    assert_eq!(count, 1);

    let err = store::follows::follow(&mut client, fan, TargetRef::event(event))
        .await
        .unwrap_err();
    assert!(err.is_duplicate());

    let count = store::follows::unfollow(&mut client, fan, TargetRef::event(event))
        .await
        .unwrap();
    assert_eq!(count, Some(0));

    let count = store::follows::unfollow(&mut client, fan, TargetRef::event(event))
        .await
        .unwrap();
    assert_eq!(count, None);

    // Users are followable too
    let count = store::follows::follow(&mut client, fan, TargetRef::user(owner))
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn vote_counter_applies_the_doubled_delta_rule() {
    let (_container, mut client) = migrated().await;
    let owner = seed_user(&client, "owner").await;
    let voter = seed_user(&client, "voter").await;

    // Fresh vote from 5 moves the counter by one
    let event_a = seed_event(&client, owner).await;
    client
        .execute(r#"UPDATE "event" SET vote_count = 5 WHERE id = $1"#, &[&event_a])
        .await
        .unwrap();
    let count = store::votes::cast_vote(&mut client, voter, TargetRef::event(event_a), Vote::Up)
        .await
        .unwrap();
    assert_eq!(count, 6);

    // With a prior vote the delta is doubled: 5 becomes 7. The rule
    // applies whether or not the prior vote pointed the other way, so
    // re-casting Up over an existing Up overshoots. That behavior is
    // deliberate and pinned here.
    let event_b = seed_event(&client, owner).await;
    store::votes::cast_vote(&mut client, voter, TargetRef::event(event_b), Vote::Up)
        .await
        .unwrap();
    client
        .execute(r#"UPDATE "event" SET vote_count = 5 WHERE id = $1"#, &[&event_b])
        .await
        .unwrap();
    let count = store::votes::cast_vote(&mut client, voter, TargetRef::event(event_b), Vote::Up)
        .await
        .unwrap();
    assert_eq!(count, 7);

    // Reversal is the case the doubling was made for: Down over Up
    // swings the counter by -2, and the single vote row flips
    let count = store::votes::cast_vote(&mut client, voter, TargetRef::event(event_b), Vote::Down)
        .await
        .unwrap();
    assert_eq!(count, 5);
    assert_eq!(
        store::votes::vote_of(&client, voter, TargetRef::event(event_b))
            .await
            .unwrap(),
        Some(Vote::Down)
    );
    assert_eq!(rows_targeting(&client, "vote", "event", event_b).await, 1);
}

#[tokio::test]
async fn deleting_an_event_cascades_to_dependents_but_not_the_owner() {
    let (_container, mut client) = migrated().await;
    let owner = seed_user(&client, "owner").await;
    let fan = seed_user(&client, "fan").await;
    let event = seed_event(&client, owner).await;
    let target = TargetRef::event(event);

    store::comments::add_comment(&client, fan, target, "see you there")
        .await
        .unwrap();
    store::comments::add_annotation(&client, fan, target, &json!({ "range": [0, 4] }))
        .await
        .unwrap();
    store::votes::cast_vote(&mut client, fan, target, Vote::Up)
        .await
        .unwrap();
    store::follows::follow(&mut client, fan, target).await.unwrap();
    store::events::add_media(&client, owner, event, "poster.png")
        .await
        .unwrap();
    store::events::add_artist(&client, event, fan).await.unwrap();
    store::attendance::set_attendance(&client, fan, event, Attendance::Yes)
        .await
        .unwrap();
    store::attendance::share_event(&client, fan, event)
        .await
        .unwrap();

    store::events::delete_event(&mut client, event).await.unwrap();

    for table in ["comment", "annotation", "follow", "vote"] {
        assert_eq!(
            rows_targeting(&client, table, "event", event).await,
            0,
            "{table} rows must be swept"
        );
    }
    for table in ["media", "attendance", "share", "event_artist"] {
        assert_eq!(
            rows_for_event(&client, table, event).await,
            0,
            "{table} rows must cascade"
        );
    }

    // The owning user is untouched
    let row = client
        .query_one(r#"SELECT count(*) FROM "user" WHERE id = $1"#, &[&owner])
        .await
        .unwrap();
    assert_eq!(row.get::<_, i64>(0), 1);
}

#[tokio::test]
async fn deleting_a_location_clears_the_event_reference() {
    let (_container, client) = migrated().await;
    let owner = seed_user(&client, "owner").await;

    let location = store::events::create_location(
        &client,
        store::events::NewLocation {
            city: "Istanbul",
            district: "Kadikoy",
            place_id: "ChIJ-abc123",
            name: "Dock 7",
            lat: Decimal::new(40_990000, 6),
            lng: Decimal::new(29_020000, 6),
        },
    )
    .await
    .unwrap();

    let event = store::events::create_event(
        &client,
        owner,
        store::events::NewEvent {
            title: "Open air",
            description: "On the water",
            date: Utc::now(),
            price: Decimal::ZERO,
            organizer_url: Some("https://dock7.example.com"),
            location_id: Some(location),
        },
    )
    .await
    .unwrap();

    store::events::delete_location(&client, location).await.unwrap();

    let row = client
        .query_one(
            r#"SELECT location_id IS NULL FROM "event" WHERE id = $1"#,
            &[&event],
        )
        .await
        .unwrap();
    assert!(row.get::<_, bool>(0), "event must survive with no location");
}

#[tokio::test]
async fn deleting_a_user_sweeps_rows_targeting_them() {
    let (_container, mut client) = migrated().await;
    let ada = seed_user(&client, "ada").await;
    let ben = seed_user(&client, "ben").await;

    store::comments::add_comment(&client, ben, TargetRef::user(ada), "great sets")
        .await
        .unwrap();
    store::follows::follow(&mut client, ben, TargetRef::user(ada))
        .await
        .unwrap();

    // Deleting ada cascades into her event; rows targeting that event
    // must go with it rather than dangle
    let event = seed_event(&client, ada).await;
    store::comments::add_comment(&client, ben, TargetRef::event(event), "can't wait")
        .await
        .unwrap();
    store::votes::cast_vote(&mut client, ben, TargetRef::event(event), Vote::Up)
        .await
        .unwrap();
    store::follows::follow(&mut client, ben, TargetRef::event(event))
        .await
        .unwrap();

    store::users::delete_user(&mut client, ada).await.unwrap();

    assert_eq!(rows_targeting(&client, "comment", "user", ada).await, 0);
    assert_eq!(rows_targeting(&client, "follow", "user", ada).await, 0);
    for table in ["comment", "vote", "follow"] {
        assert_eq!(
            rows_targeting(&client, table, "event", event).await,
            0,
            "{table} rows targeting the cascaded event must be swept"
        );
    }

    let row = client
        .query_one(r#"SELECT count(*) FROM "user" WHERE id = $1"#, &[&ben])
        .await
        .unwrap();
    assert_eq!(row.get::<_, i64>(0), 1);
}

#[tokio::test]
async fn location_and_corporate_profile_are_one_to_one() {
    let (_container, mut client) = migrated().await;
    let owner = seed_user(&client, "owner").await;

    let location = store::events::create_location(
        &client,
        store::events::NewLocation {
            city: "Istanbul",
            district: "Besiktas",
            place_id: "ChIJ-def456",
            name: "Pier 3",
            lat: Decimal::new(41_040000, 6),
            lng: Decimal::new(29_000000, 6),
        },
    )
    .await
    .unwrap();

    let new_event = |title: &'static str| store::events::NewEvent {
        title,
        description: "On the water",
        date: Utc::now(),
        price: Decimal::ZERO,
        organizer_url: None,
        location_id: Some(location),
    };
    store::events::create_event(&client, owner, new_event("First"))
        .await
        .unwrap();
    let err = store::events::create_event(&client, owner, new_event("Second"))
        .await
        .unwrap_err();
    assert!(err.is_duplicate(), "a location backs at most one event");

    let org = seed_user(&client, "org").await;
    let other = seed_user(&client, "other").await;
    let profile = store::users::attach_corporate_profile(&mut client, org, None)
        .await
        .unwrap();
    let err = client
        .execute(
            r#"UPDATE "user" SET corporate_profile_id = $1 WHERE id = $2"#,
            &[&profile, &other],
        )
        .await
        .unwrap_err();
    assert!(
        err.as_db_error()
            .is_some_and(|db| db.code() == &tokio_postgres::error::SqlState::UNIQUE_VIOLATION),
        "a corporate profile belongs to at most one user"
    );
}

#[tokio::test]
async fn corporate_profile_is_attached_and_survivable() {
    let (_container, mut client) = migrated().await;
    let org = seed_user(&client, "org").await;

    let profile =
        store::users::attach_corporate_profile(&mut client, org, Some("https://org.example.com"))
            .await
            .unwrap();

    let row = client
        .query_one(
            r#"SELECT is_corporate, corporate_profile_id FROM "user" WHERE id = $1"#,
            &[&org],
        )
        .await
        .unwrap();
    assert!(row.get::<_, bool>(0));
    assert_eq!(row.get::<_, Option<i64>>(1), Some(profile));

    // Dropping the profile clears the reference without touching the user
    client
        .execute(r#"DELETE FROM "corporate_profile" WHERE id = $1"#, &[&profile])
        .await
        .unwrap();
    let row = client
        .query_one(
            r#"SELECT corporate_profile_id IS NULL FROM "user" WHERE id = $1"#,
            &[&org],
        )
        .await
        .unwrap();
    assert!(row.get::<_, bool>(0));
}

#[tokio::test]
async fn messages_flow_between_conversation_members_only() {
    let (_container, mut client) = migrated().await;
    let ada = seed_user(&client, "ada").await;
    let ben = seed_user(&client, "ben").await;
    let eve = seed_user(&client, "eve").await;

    let conversation = store::messaging::start_conversation(&client, ada, ben)
        .await
        .unwrap();

    let message = store::messaging::send_message(&mut client, conversation, ada, "doors at 9")
        .await
        .unwrap();
    let row = client
        .query_one(
            r#"SELECT receiver_id FROM "message" WHERE id = $1"#,
            &[&message],
        )
        .await
        .unwrap();
    assert_eq!(row.get::<_, i64>(0), ben);

    // The participant replies to the owner
    let message = store::messaging::send_message(&mut client, conversation, ben, "on my way")
        .await
        .unwrap();
    let row = client
        .query_one(
            r#"SELECT receiver_id FROM "message" WHERE id = $1"#,
            &[&message],
        )
        .await
        .unwrap();
    assert_eq!(row.get::<_, i64>(0), ada);

    let err = store::messaging::send_message(&mut client, conversation, eve, "hi")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotParticipant { .. }));

    // Deleting the conversation takes its messages with it
    client
        .execute(r#"DELETE FROM "conversation" WHERE id = $1"#, &[&conversation])
        .await
        .unwrap();
    let row = client
        .query_one(
            r#"SELECT count(*) FROM "message" WHERE conversation_id = $1"#,
            &[&conversation],
        )
        .await
        .unwrap();
    assert_eq!(row.get::<_, i64>(0), 0);
}

#[tokio::test]
async fn blocking_a_user_twice_is_a_duplicate() {
    let (_container, client) = migrated().await;
    let ada = seed_user(&client, "ada").await;
    let ben = seed_user(&client, "ben").await;

    store::users::block_user(&client, ada, ben).await.unwrap();
    let err = store::users::block_user(&client, ada, ben).await.unwrap_err();
    assert!(err.is_duplicate());
}
