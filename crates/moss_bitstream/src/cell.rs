//! The cell serialization interface.
//!
//! Every configurable cell subtype knows how to read its state out of a
//! [`Bitstream`] and write it back, at a base offset fixed when the device
//! model is built. The place-and-route engine never calls these; its only
//! responsibility is to mate every netlist cell with a device site before
//! serialization runs.

use crate::image::Bitstream;
use moss_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A cell that serializes its configuration into a [`Bitstream`] field.
pub trait ConfigCell {
    /// A short name for diagnostics (e.g. `"clkbuf_2"`).
    fn name(&self) -> &str;

    /// The base offset of this cell's configuration field, in bits.
    fn config_base(&self) -> usize;

    /// Populates configuration state from the image.
    fn load(&mut self, bitstream: &Bitstream);

    /// Writes configuration state back into the image.
    ///
    /// Returns `false` if the cell's current state is not encodable (for
    /// muxed cells, an input selection outside the legal mux table).
    fn save(&self, bitstream: &mut Bitstream) -> bool;
}

/// A cell whose single input is chosen by a mux with a fixed legal table.
///
/// Models the clock-buffer-style cells of this device class: a small
/// selector field at the config base encodes which of a handful of legal
/// sources drives the cell. Selecting a source outside the table is
/// representable in memory (routing may produce it) but rejected at
/// serialization time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuxedInputCell {
    name: String,
    config_base: usize,
    select_width: usize,
    /// Legal input sources and their selector encodings.
    mux_table: BTreeMap<String, u32>,
    /// The currently selected input source, if any.
    selected: Option<String>,
}

impl MuxedInputCell {
    /// Creates a cell with the given field location and legal mux table.
    pub fn new(
        name: impl Into<String>,
        config_base: usize,
        select_width: usize,
        mux_table: BTreeMap<String, u32>,
    ) -> Self {
        Self {
            name: name.into(),
            config_base,
            select_width,
            mux_table,
            selected: None,
        }
    }

    /// Selects an input source. Legality is checked at save time, not here.
    pub fn select(&mut self, input: impl Into<String>) {
        self.selected = Some(input.into());
    }

    /// Returns the currently selected input source.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }
}

impl ConfigCell for MuxedInputCell {
    fn name(&self) -> &str {
        &self.name
    }

    fn config_base(&self) -> usize {
        self.config_base
    }

    fn load(&mut self, bitstream: &Bitstream) {
        let selector = bitstream.read_bits(self.config_base, self.select_width);
        self.selected = self
            .mux_table
            .iter()
            .find(|(_, &encoding)| encoding == selector)
            .map(|(input, _)| input.clone());
    }

    fn save(&self, bitstream: &mut Bitstream) -> bool {
        // An unconfigured mux keeps its field cleared
        let Some(input) = &self.selected else {
            return true;
        };
        let Some(&selector) = self.mux_table.get(input) else {
            return false;
        };
        bitstream.write_bits(self.config_base, self.select_width, selector);
        true
    }
}

/// Saves every cell into the image, reporting rejected cells to the sink.
///
/// Returns `true` iff all cells serialized. Rejections are emitted as
/// bitstream-category diagnostics and do not stop the remaining cells from
/// being written.
pub fn save_cells<'a, I>(cells: I, bitstream: &mut Bitstream, sink: &DiagnosticSink) -> bool
where
    I: IntoIterator<Item = &'a dyn ConfigCell>,
{
    let mut ok = true;
    for cell in cells {
        if !cell.save(bitstream) {
            sink.emit(Diagnostic::error(
                DiagnosticCode::new(Category::Bitstream, 401),
                format!("cell {} has a configuration that cannot be serialized", cell.name()),
            ));
            ok = false;
        }
    }
    ok
}
