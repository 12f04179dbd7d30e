//! Small text helpers shared by the editor, output and toolbox.

pub mod text;
