//! Recording test doubles
//!
//! [`RecordingTransport`] captures every framed byte so protocol tests can
//! assert on exact sequences without hardware. [`RecordingDelay`] captures
//! every requested wait.
//!
//! Only compiled for tests and with the `std` feature.

use embedded_hal::delay::DelayNs;

use crate::error::DisplayError;
use crate::transport::Transport;

/// One byte as it crossed the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    /// Sent with D/C low.
    Register(u8),
    /// Sent with D/C high.
    Data(u8),
}

impl Frame {
    /// The raw byte regardless of D/C level.
    pub fn byte(self) -> u8 {
        match self {
            Self::Register(b) | Self::Data(b) => b,
        }
    }

    /// `true` for a register (command) byte.
    pub fn is_register(self) -> bool {
        matches!(self, Self::Register(_))
    }
}

/// [`Transport`] that records instead of sending.
///
/// Optionally fails every write after the first `n` with
/// [`DisplayError::Communication`]; failed writes are not recorded.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    frames: Vec<Frame>,
    fail_after: Option<usize>,
}

impl RecordingTransport {
    /// Empty recording that never fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `n` writes, then fail all of them.
    pub fn failing_after(n: usize) -> Self {
        Self {
            frames: Vec::new(),
            fail_after: Some(n),
        }
    }

    /// Everything recorded so far, in order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Forget the recording (failure budget is kept).
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Opcodes only, in order.
    pub fn registers(&self) -> Vec<u8> {
        self.frames
            .iter()
            .filter(|f| f.is_register())
            .map(|f| f.byte())
            .collect()
    }

    /// How many times `opcode` was sent.
    pub fn count_register(&self, opcode: u8) -> usize {
        self.frames
            .iter()
            .filter(|f| **f == Frame::Register(opcode))
            .count()
    }

    /// Group the recording into `(opcode, params)` pairs.
    ///
    /// Data bytes before the first register byte are dropped.
    pub fn commands(&self) -> Vec<(u8, Vec<u8>)> {
        let mut out: Vec<(u8, Vec<u8>)> = Vec::new();
        for frame in &self.frames {
            match *frame {
                Frame::Register(op) => out.push((op, Vec::new())),
                Frame::Data(b) => {
                    if let Some((_, params)) = out.last_mut() {
                        params.push(b);
                    }
                }
            }
        }
        out
    }

    /// Data bytes following the last occurrence of `opcode`.
    pub fn data_after_last(&self, opcode: u8) -> Vec<u8> {
        self.commands()
            .into_iter()
            .rev()
            .find(|(op, _)| *op == opcode)
            .map(|(_, params)| params)
            .unwrap_or_default()
    }

    fn record(&mut self, frame: Frame) -> Result<(), DisplayError> {
        if let Some(limit) = self.fail_after {
            if self.frames.len() >= limit {
                return Err(DisplayError::Communication);
            }
        }
        self.frames.push(frame);
        Ok(())
    }
}

impl Transport for RecordingTransport {
    fn write_register_byte(&mut self, value: u8) -> Result<(), DisplayError> {
        self.record(Frame::Register(value))
    }

    fn write_data_byte(&mut self, value: u8) -> Result<(), DisplayError> {
        self.record(Frame::Data(value))
    }
}

/// [`DelayNs`] that returns immediately and remembers each request in ns.
#[derive(Debug, Clone, Default)]
pub struct RecordingDelay {
    calls: Vec<u64>,
}

impl RecordingDelay {
    /// No calls yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requested waits, in nanoseconds, in call order.
    pub fn calls(&self) -> &[u64] {
        &self.calls
    }

    /// Sum of all requested waits.
    pub fn total_ns(&self) -> u64 {
        self.calls.iter().sum()
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls.push(u64::from(ns));
    }
}
