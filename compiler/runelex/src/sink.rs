//! Where emitted tokens go.
//!
//! Enum dispatch over the two delivery modes: a rendezvous channel to a
//! consumer thread, or a plain vector for synchronous scans.

use crossbeam::channel::{select, Sender};

use crate::cancel::Control;
use crate::{ScanError, Token};

pub(crate) enum Sink {
    /// Tokens accumulate in order; used by `Lexer::tokenize`.
    Collect(Vec<Token>),
    /// Capacity-zero channel: every send waits for the consumer.
    Channel(Sender<Token>),
}

/// Outcome of handing one token to the sink.
pub(crate) enum Delivery {
    Delivered,
    /// The consumer dropped its end of the stream.
    Disconnected,
    /// Cancellation or timeout fired while waiting for the consumer.
    Halted(ScanError),
}

impl Sink {
    /// Deliver `token`, blocking until the consumer takes it or `control`
    /// says to give up.
    pub(crate) fn deliver(&mut self, token: Token, control: &Control) -> Delivery {
        match self {
            Self::Collect(tokens) => {
                tokens.push(token);
                Delivery::Delivered
            }
            Self::Channel(tx) => {
                let tx: &Sender<Token> = tx;
                if let Some(reason) = control.poll() {
                    return Delivery::Halted(reason);
                }
                let woken = control.woken();
                let timer = control.timer();
                select! {
                    send(tx, token) -> sent => match sent {
                        Ok(()) => Delivery::Delivered,
                        Err(_) => Delivery::Disconnected,
                    },
                    recv(woken) -> _ => match control.poll() {
                        Some(reason) => Delivery::Halted(reason),
                        // Every cancel handle is gone, so the stream is too.
                        None => Delivery::Disconnected,
                    },
                    recv(timer) -> _ => Delivery::Halted(control.timed_out()),
                }
            }
        }
    }

    /// Swap out the collected tokens, leaving the sink empty.
    pub(crate) fn take_collected(&mut self) -> Vec<Token> {
        match self {
            Self::Collect(tokens) => std::mem::take(tokens),
            Self::Channel(_) => Vec::new(),
        }
    }
}
