//! Assembled packets and the dispatch seam.

use parking_lot::Mutex;
use uuid::Uuid;

use crate::kind::PacketKind;

/// A connected player, addressed by account id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerId(pub Uuid);

/// One encoded packet body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub kind: PacketKind,
    pub body: Vec<u8>,
}

/// One or more encoded frames, ready to send to any number of players.
///
/// Construction (expensive, version-dependent) is separated from dispatch
/// (to whom, when) so a packet built once can be scheduled freely. Dispatch
/// is fire-and-forget: the wire protocol has no acknowledgement, so there is
/// nothing to retry at this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundPacket {
    frames: Vec<Frame>,
}

impl OutboundPacket {
    #[must_use]
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    #[must_use]
    pub fn single(kind: PacketKind, body: Vec<u8>) -> Self {
        Self {
            frames: vec![Frame { kind, body }],
        }
    }

    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn send_to(&self, sink: &dyn PacketSink, player: PlayerId) {
        for frame in &self.frames {
            sink.send(player, frame.kind, &frame.body);
        }
    }

    pub fn send_to_each(&self, sink: &dyn PacketSink, players: impl IntoIterator<Item = PlayerId>) {
        for player in players {
            self.send_to(sink, player);
        }
    }

    pub fn send_to_filtered(
        &self,
        sink: &dyn PacketSink,
        players: impl IntoIterator<Item = PlayerId>,
        mut include: impl FnMut(&PlayerId) -> bool,
    ) {
        for player in players {
            if include(&player) {
                self.send_to(sink, player);
            }
        }
    }
}

/// Transport seam for encoded frames.
///
/// Implementations hand the bytes to the host server's connection for the
/// player. A send to a player who disconnected mid-operation is simply
/// dropped by the transport; the packet is moot.
pub trait PacketSink: Send + Sync {
    fn send(&self, player: PlayerId, kind: PacketKind, body: &[u8]);
}

/// Sink that captures every frame, for tests and offline inspection.
#[derive(Debug, Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<(PlayerId, Frame)>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sent(&self) -> Vec<(PlayerId, Frame)> {
        self.sent.lock().clone()
    }

    #[must_use]
    pub fn sent_kinds(&self) -> Vec<PacketKind> {
        self.sent.lock().iter().map(|(_, frame)| frame.kind).collect()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.sent.lock().len()
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }
}

impl PacketSink for RecordingSink {
    fn send(&self, player: PlayerId, kind: PacketKind, body: &[u8]) {
        self.sent.lock().push((
            player,
            Frame {
                kind,
                body: body.to_vec(),
            },
        ));
    }
}
