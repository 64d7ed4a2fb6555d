mod support;

use spacewars_server::interface_adapters::protocol::{WireRecord, decode_record};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

const READ_TIMEOUT: Duration = Duration::from_secs(5);

struct Client {
    ship_id: u32,
    world_size: u32,
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn join(name: &str) -> Client {
        let addr = support::ensure_server();
        let stream = TcpStream::connect(addr).await.expect("connect");
        let (reader, mut writer) = stream.into_split();
        writer
            .write_all(format!("{name}\n").as_bytes())
            .await
            .expect("send name");

        let mut lines = BufReader::new(reader).lines();
        let ship_id = next_line(&mut lines).await.parse().expect("ship id");
        let world_size = next_line(&mut lines).await.parse().expect("world size");
        Client {
            ship_id,
            world_size,
            lines,
            writer,
        }
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\n").as_bytes())
            .await
            .expect("send line");
    }

    // Reads world records until one matches, failing after a bounded number of lines.
    async fn wait_for<F>(&mut self, mut matches: F) -> WireRecord
    where
        F: FnMut(&WireRecord) -> bool,
    {
        for _ in 0..10_000 {
            let line = next_line(&mut self.lines).await;
            let record = decode_record(&line).expect("world record");
            if matches(&record) {
                return record;
            }
        }
        panic!("expected record never arrived");
    }
}

async fn next_line(lines: &mut Lines<BufReader<OwnedReadHalf>>) -> String {
    timeout(READ_TIMEOUT, lines.next_line())
        .await
        .expect("line before timeout")
        .expect("read line")
        .expect("connection open")
}

#[tokio::test]
async fn test_handshake_returns_id_and_world_size() {
    let first = Client::join("alpha").await;
    let second = Client::join("beta").await;

    assert_eq!(first.world_size, support::TEST_WORLD_SIZE);
    assert_eq!(second.world_size, support::TEST_WORLD_SIZE);
    assert_ne!(first.ship_id, second.ship_id);
}

#[tokio::test]
async fn test_own_ship_is_broadcast_after_join() {
    let mut client = Client::join("pilot").await;
    let ship_id = client.ship_id;

    let record = client
        .wait_for(|r| matches!(r, WireRecord::Ship(s) if s.ship == ship_id))
        .await;

    let WireRecord::Ship(ship) = record else {
        unreachable!("filtered for ships");
    };
    assert_eq!(ship.name, "pilot");
    assert_eq!(ship.hp, 5);
    assert_eq!(ship.score, 0);
}

#[tokio::test]
async fn test_thrust_command_sets_thrust_flag() {
    let mut client = Client::join("thruster").await;
    let ship_id = client.ship_id;
    client
        .wait_for(|r| matches!(r, WireRecord::Ship(s) if s.ship == ship_id))
        .await;

    // Keep thrusting until a tick applies it; each tick clears the queue.
    for _ in 0..50 {
        client.send("(T)").await;
        let record = client
            .wait_for(|r| matches!(r, WireRecord::Ship(s) if s.ship == ship_id))
            .await;
        if matches!(record, WireRecord::Ship(ref ship) if ship.thrust) {
            return;
        }
    }
    panic!("thrust flag never observed");
}

#[tokio::test]
async fn test_players_see_each_other() {
    let mut watcher = Client::join("watcher").await;
    let other = Client::join("other").await;
    let other_id = other.ship_id;

    let record = watcher
        .wait_for(|r| matches!(r, WireRecord::Ship(s) if s.ship == other_id))
        .await;
    let WireRecord::Ship(ship) = record else {
        unreachable!("filtered for ships");
    };
    assert_eq!(ship.name, "other");
}

#[tokio::test]
async fn test_early_disconnect_does_not_affect_later_clients() {
    let addr = support::ensure_server();
    let stream = TcpStream::connect(addr).await.expect("connect");
    drop(stream);

    let client = Client::join("after").await;
    assert_eq!(client.world_size, support::TEST_WORLD_SIZE);
}
