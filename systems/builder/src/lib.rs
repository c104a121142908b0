#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system translating pointer input into tower selection and placement commands.

use rampart_core::{Command, Event, TileGrid, TowerKind, WorldPoint};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BuilderInput {
    /// Tower kind whose selection button was pressed on this frame.
    pub select: Option<TowerKind>,
    /// Indicates whether the tower management button was pressed on this frame.
    pub toggle_panel: bool,
    /// Indicates whether the primary button was pressed over the map on this frame.
    pub confirm_action: bool,
    /// Pointer position in world coordinates, if the pointer is known.
    pub pointer: Option<WorldPoint>,
}

impl BuilderInput {
    /// Creates an input describing a placement click at the provided position.
    #[must_use]
    pub const fn click(pointer: WorldPoint) -> Self {
        Self {
            select: None,
            toggle_panel: false,
            confirm_action: true,
            pointer: Some(pointer),
        }
    }

    /// Creates an input describing a press of the selection button for `kind`.
    #[must_use]
    pub const fn select(kind: TowerKind) -> Self {
        Self {
            select: Some(kind),
            toggle_panel: false,
            confirm_action: false,
            pointer: None,
        }
    }
}

/// Builder system that gates placement clicks behind a pending selection.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    selection: Option<TowerKind>,
    panel_open: bool,
}

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            selection: None,
            panel_open: false,
        }
    }

    /// Tower kind the world reported as pending placement.
    #[must_use]
    pub const fn selection(&self) -> Option<TowerKind> {
        self.selection
    }

    /// Reports whether the tower management panel is open.
    #[must_use]
    pub const fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    /// Consumes world events and adapter-derived input to emit builder commands.
    ///
    /// Clicks over the map are ignored while the management panel is open or
    /// while no tower kind is pending. Selecting a kind closes the panel.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: BuilderInput,
        grid: &TileGrid,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::TowerSelectionChanged { kind } = event {
                self.selection = *kind;
            }
        }

        if input.toggle_panel {
            self.panel_open = !self.panel_open;
        }

        if let Some(kind) = input.select {
            self.panel_open = false;
            out.push(Command::SelectTower { kind });
            return;
        }

        if !input.confirm_action || self.panel_open || self.selection.is_none() {
            return;
        }

        if let Some(tile) = input.pointer.and_then(|pointer| grid.tile_at(pointer)) {
            out.push(Command::PlaceTower { tile });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_toggles_and_closes_on_selection() {
        let mut builder = Builder::new();
        let grid = TileGrid::new(4, 4, 64.0, 64.0);
        let mut commands = Vec::new();

        builder.handle(
            &[],
            BuilderInput {
                toggle_panel: true,
                ..BuilderInput::default()
            },
            &grid,
            &mut commands,
        );
        assert!(builder.is_panel_open());

        builder.handle(&[], BuilderInput::select(TowerKind::Ice), &grid, &mut commands);
        assert!(!builder.is_panel_open());
        assert_eq!(
            commands,
            vec![Command::SelectTower {
                kind: TowerKind::Ice,
            }]
        );
    }
}
