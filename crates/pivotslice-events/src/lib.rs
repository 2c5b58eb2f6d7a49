use crossbeam_channel::{unbounded, Receiver, Sender};
use pivotslice_core::{AxisKind, CellCoord, PublicationId};
use serde::{Deserialize, Serialize};

/// Notifications published after a grid session applied a change. Consumers
/// (renderer, history panel, overlays) re-read the session state they need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    // ========================================================================
    // Filter Lines
    // ========================================================================
    FilterAdded {
        axis: AxisKind,
        index: usize,
    },
    FilterRemoved {
        axis: AxisKind,
        index: usize,
    },
    FilterUpdated {
        axis: AxisKind,
        index: usize,
    },
    /// One filter became `pieces` single-value filters starting at `index`.
    FilterSplit {
        axis: AxisKind,
        index: usize,
        pieces: usize,
    },
    FiltersMerged {
        axis: AxisKind,
        removed: usize,
        into: usize,
    },
    /// Layout facet or collapse state of a line changed.
    LineRelayout {
        axis: AxisKind,
        index: usize,
    },

    // ========================================================================
    // Cells
    // ========================================================================
    CellModeChanged {
        cell: CellCoord,
    },
    CellRelayout {
        cell: CellCoord,
    },
    CellSelected {
        cell: Option<CellCoord>,
    },

    // ========================================================================
    // Graph
    // ========================================================================
    GraphGrew {
        added: Vec<PublicationId>,
    },
    GraphPruned {
        remaining: usize,
    },
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        let _ = self.tx.send(event);
    }

    /// Dispatch all pending events to a listener.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }
}

/// Trait for components that respond to events.
/// Implement this to receive events from the EventBus.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}
