#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input system responsible for emitting tile selection and build commands.

use tile_defence_core::Command;

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderInput {
    /// Pointer position in world units if the primary button was clicked.
    pub click: Option<(i32, i32)>,
    /// Indicates whether the build key is held on this frame.
    pub build_held: bool,
}

impl BuilderInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(click: Option<(i32, i32)>, build_held: bool) -> Self {
        Self { click, build_held }
    }
}

/// Input system that translates pointer clicks and the build key into grid commands.
///
/// A held build key only triggers one build request, on the frame it goes down.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    build_was_held: bool,
}

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            build_was_held: false,
        }
    }

    /// Consumes one frame of input and emits the corresponding commands.
    ///
    /// Selection is emitted before the build request so a click and a build
    /// press on the same frame build on the clicked tile.
    pub fn handle(&mut self, input: BuilderInput, out: &mut Vec<Command>) {
        if let Some((x, y)) = input.click {
            out.push(Command::ProcessClick { x, y });
        }

        if input.build_held && !self.build_was_held {
            out.push(Command::BuildAtSelection);
        }
        self.build_was_held = input.build_held;
    }
}
