use anyhow::Result;
use chrono::Utc;
use log::{error, info};
use matrix_rust::client::ClientProxyEvent;
use matrix_rust::sdk::in_memory::{InMemoryRoom, InMemorySdkClient};
use matrix_rust::sdk::{MediaSource, SdkEvent};
use matrix_rust::session::UserSession;
use matrix_rust::store::{MemoryTokenStore, TokenStore};
use std::time::Duration;

// This is a demo of the client layer running against the in-memory SDK:
// it logs in a fake user, mutates the backend room set a few times and
// prints each reconciled room list as it is published.

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "{} [{:<5}] [{}] - {}",
                Utc::now().format("%H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build tokio runtime");

    rt.block_on(async {
        if let Err(err) = run().await {
            error!("Demo failed: {err}");
        }
    });
}

async fn run() -> Result<()> {
    let token_store = MemoryTokenStore::new();
    token_store
        .set_access_token("@demo:example.org", "syt_demo_token")
        .await?;
    info!(
        "Stored {} session token(s)",
        token_store.access_tokens().await?.len()
    );

    let sdk = InMemorySdkClient::new("@demo:example.org");
    sdk.set_display_name("Demo User");
    sdk.set_avatar_url("mxc://example.org/demo-avatar");
    sdk.insert_media(
        MediaSource::from_url("mxc://example.org/demo-avatar"),
        vec![0u8; 64],
    );

    let rust_room = InMemoryRoom::new("!rust:example.org");
    rust_room.set_display_name("Rust");
    rust_room.add_member("@alice:example.org", "Alice");
    rust_room.set_latest_event(SdkEvent {
        event_id: "$1".to_string(),
        sender_id: "@alice:example.org".to_string(),
        body: "morning all".to_string(),
        timestamp: Utc::now(),
    });

    let matrix_room = InMemoryRoom::new("!matrix:example.org");
    matrix_room.set_display_name("Matrix HQ");

    // Spaces never surface in the room list.
    let community_space = InMemoryRoom::space("!community:example.org");

    let session = UserSession::new(sdk.clone());

    let mut events = session.client_proxy.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(ClientProxyEvent::RoomListUpdated(rooms)) = events.recv().await {
            info!("Room list updated ({} rooms):", rooms.len());
            for room in rooms.iter() {
                let name = room.display_name().unwrap_or_else(|| room.id().to_string());
                match room.latest_event_brief() {
                    Some(brief) => {
                        let sender = brief
                            .sender_display_name
                            .unwrap_or_else(|| brief.sender_id.clone());
                        info!("  {name}: {sender}: {}", brief.body);
                    }
                    None => info!("  {name}"),
                }
            }
        }
    });

    match session.client_proxy.load_user_display_name().await {
        Ok(name) => info!("Logged in as {name}"),
        Err(err) => info!("Display name unavailable: {err}"),
    }
    if let Ok(url) = session.client_proxy.load_user_avatar_url().await {
        let avatar = session.media_provider.load_image_from_url(&url).await?;
        info!("Loaded avatar ({} bytes)", avatar.len());
    }

    sdk.set_rooms(vec![
        rust_room.clone(),
        matrix_room.clone(),
        community_space,
    ]);
    settle().await;

    let offtopic_room = InMemoryRoom::new("!offtopic:example.org");
    offtopic_room.set_display_name("Off Topic");
    sdk.set_rooms(vec![
        rust_room.clone(),
        matrix_room.clone(),
        offtopic_room.clone(),
    ]);
    settle().await;

    // A tombstoned room drops out on the next pass even though it is cached.
    matrix_room.set_tombstoned(true);
    sdk.notify_room_list_changed();
    settle().await;

    session.client_proxy.stop();
    drop(session);
    let _ = printer.await;

    Ok(())
}

/// Gives the update loop a moment to run a pass before the next mutation.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}
