use crate::domain::ShipId;
use crate::interface_adapters::net::framing::{FrameError, LineBuffer};
use crate::interface_adapters::net::session::{LineAction, SessionPhase};
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::ids::conn_id;
use crate::use_cases::GameEvent;

use std::{
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{Instrument, debug, info, info_span, warn};

#[derive(Debug, Error)]
pub enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed frame: {0}")]
    Frame(#[from] FrameError),
    #[error("world input channel closed")]
    InputClosed,
    #[error("connection closed before name exchange")]
    ClosedBeforeName,
}

enum LoopControl {
    Continue,
    Disconnect,
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);
const READ_BUFFER_LEN: usize = 4096;
/// Frames queued per session before the world task starts dropping them.
pub const SESSION_OUTBOUND_CAPACITY: usize = 64;

struct ConnCtx {
    phase: SessionPhase,
    lines: LineBuffer,
    // Held until the Join event hands it to the world task.
    outbound_tx: Option<mpsc::Sender<Arc<str>>>,
    msgs_in: u64,
    frames_out: u64,
    bytes_out: u64,
    last_input_full_log: Instant,
    last_invalid_input_log: Instant,
}

pub async fn handle_connection(stream: TcpStream, peer: SocketAddr, state: Arc<AppState>) {
    // Separate connection id for correlating logs before/after a ship id exists.
    let conn_id = conn_id();
    let span = info_span!("conn", conn_id, %peer, ship_id = tracing::field::Empty);

    async move {
        debug!("client connected");
        match run_client_loop(stream, &state).await {
            Ok(()) => {}
            Err(NetError::ClosedBeforeName) => {
                info!("client disconnected before name exchange");
            }
            Err(e) => warn!(error = %e, "client loop exited with error"),
        }
    }
    .instrument(span)
    .await
}

async fn run_client_loop(stream: TcpStream, state: &AppState) -> Result<(), NetError> {
    let (mut reader, mut writer) = stream.into_split();
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<Arc<str>>(SESSION_OUTBOUND_CAPACITY);
    let now = Instant::now() - LOG_THROTTLE;
    let mut ctx = ConnCtx {
        phase: SessionPhase::AwaitingName,
        lines: LineBuffer::new(),
        outbound_tx: Some(outbound_tx),
        msgs_in: 0,
        frames_out: 0,
        bytes_out: 0,
        last_input_full_log: now,
        last_invalid_input_log: now,
    };
    let mut buf = [0u8; READ_BUFFER_LEN];
    let mut fatal: Option<NetError> = None;

    loop {
        // disconnect becomes true on error
        let disconnect: bool = tokio::select! {
            // Incoming bytes from the client
            read = reader.read(&mut buf) => {
                match read {
                    Ok(0) => true,
                    Ok(n) => {
                        ctx.lines.extend(&buf[..n]);
                        match drain_lines(&mut ctx, &mut writer, state).await {
                            Ok(LoopControl::Continue) => false,
                            Ok(LoopControl::Disconnect) => true,
                            Err(e) => {
                                fatal = Some(e);
                                true
                            }
                        }
                    }
                    Err(e) => {
                        fatal = Some(NetError::Io(e));
                        true
                    }
                }
            }

            // Outgoing world frame
            frame = outbound_rx.recv() => {
                match frame {
                    Some(frame) => match writer.write_all(frame.as_bytes()).await {
                        Ok(()) => {
                            ctx.frames_out += 1;
                            ctx.bytes_out += frame.len() as u64;
                            false
                        }
                        Err(e) => {
                            fatal = Some(NetError::Io(e));
                            true
                        }
                    },
                    // The world task dropped the session.
                    None => true,
                }
            }
        };

        if disconnect {
            break;
        }
    }

    let _ = writer.shutdown().await;
    disconnect_cleanup(&ctx, state).await;

    match (fatal, ctx.phase) {
        (Some(err), _) => Err(err),
        (None, SessionPhase::AwaitingName) => Err(NetError::ClosedBeforeName),
        (None, SessionPhase::Playing { .. }) => Ok(()),
    }
}

async fn drain_lines(
    ctx: &mut ConnCtx,
    writer: &mut OwnedWriteHalf,
    state: &AppState,
) -> Result<LoopControl, NetError> {
    while let Some(line) = ctx.lines.next_line()? {
        ctx.msgs_in += 1;
        let action = ctx.phase.on_line(&line, &state.ship_ids, state.world_size);
        if let LoopControl::Disconnect = handle_action(ctx, writer, state, action).await? {
            return Ok(LoopControl::Disconnect);
        }
    }
    Ok(LoopControl::Continue)
}

async fn handle_action(
    ctx: &mut ConnCtx,
    writer: &mut OwnedWriteHalf,
    state: &AppState,
    action: LineAction,
) -> Result<LoopControl, NetError> {
    match action {
        LineAction::Join {
            ship_id,
            name,
            reply,
        } => {
            let Some(outbound) = ctx.outbound_tx.take() else {
                return Ok(LoopControl::Disconnect);
            };
            tracing::Span::current().record("ship_id", ship_id);
            info!(ship_id, %name, "client joined");
            state
                .input_tx
                .send(GameEvent::Join {
                    ship_id,
                    name,
                    outbound,
                })
                .await
                .map_err(|_| NetError::InputClosed)?;
            writer.write_all(reply.as_bytes()).await?;
            Ok(LoopControl::Continue)
        }
        LineAction::Commands { ship_id, commands } => {
            match state
                .input_tx
                .try_send(GameEvent::Commands { ship_id, commands })
            {
                Ok(()) => Ok(LoopControl::Continue),
                Err(TrySendError::Full(_evt)) => {
                    if should_log(&mut ctx.last_input_full_log) {
                        warn!(ship_id, "input channel full; dropping commands");
                    }
                    Ok(LoopControl::Continue)
                }
                Err(TrySendError::Closed(_evt)) => Err(NetError::InputClosed),
            }
        }
        LineAction::Ignored => {
            if should_log(&mut ctx.last_invalid_input_log) {
                warn!(ship_id = ctx.phase.ship_id(), "malformed command line dropped");
            }
            Ok(LoopControl::Continue)
        }
    }
}

async fn disconnect_cleanup(ctx: &ConnCtx, state: &AppState) {
    let Some(ship_id) = ctx.phase.ship_id() else {
        return;
    };
    notify_leave(state, ship_id).await;
    info!(
        ship_id,
        msgs_in = ctx.msgs_in,
        frames_out = ctx.frames_out,
        bytes_out = ctx.bytes_out,
        "client disconnected"
    );
}

async fn notify_leave(state: &AppState, ship_id: ShipId) {
    if state
        .input_tx
        .send(GameEvent::Leave { ship_id })
        .await
        .is_err()
    {
        debug!(ship_id, "world task gone; leave not delivered");
    }
}

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}
