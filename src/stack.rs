//! Walks the current thread's call stack and reports, for every active
//! frame, its instruction pointer and stack pointer.
//!
//! Frames are read with [`backtrace::trace`], which unwinds from a snapshot
//! of the register state taken inside [`capture`]. Frames that belong to the
//! unwinder itself are dropped so the report starts at the caller.

use std::ffi::c_void;
use std::fmt;
use std::io::Write;

use log::{debug, info};
use serde::Serialize;

use crate::error::{KaleidoError, Result};

/// One active call frame.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Frame {
    /// 0 for the innermost reported frame.
    pub index: usize,

    /// Instruction pointer (return address for all but the innermost frame).
    pub ip: usize,

    /// Stack pointer; 0 where the platform unwinder cannot report it.
    pub sp: usize,

    /// Demangled function name, when requested and available.
    pub symbol: Option<String>,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ip = {:x}, sp = {:x}", self.ip, self.sp)?;

        if let Some(symbol) = &self.symbol {
            write!(f, "  {}", symbol)?;
        }

        Ok(())
    }
}

struct RawFrame {
    ip: usize,
    sp: usize,
    symbol_address: usize,
}

fn symbol_name(ip: usize) -> Option<String> {
    let mut name = None;

    backtrace::resolve(ip as *mut c_void, |symbol| {
        if name.is_none() {
            name = symbol.name().map(|n| n.to_string());
        }
    });

    name
}

/// Walk the stack and keep only the frames above the one whose function
/// address is `marker`. When no frame matches (no unwind tables for the
/// symbol, or the walk began somewhere unexpected), every frame is kept.
fn frames_above(marker: usize, resolve: bool) -> Vec<Frame> {
    let mut raw: Vec<RawFrame> = Vec::new();

    backtrace::trace(|frame| {
        raw.push(RawFrame {
            ip: frame.ip() as usize,
            sp: frame.sp() as usize,
            symbol_address: frame.symbol_address() as usize,
        });

        true
    });

    debug!("Unwound {} raw frames", raw.len());

    let skip = raw
        .iter()
        .position(|f| f.symbol_address == marker)
        .map(|pos| pos + 1)
        .unwrap_or(0);

    debug!("Skipping {} unwinder frames", skip);

    let frames: Vec<Frame> = raw
        .into_iter()
        .skip(skip)
        .enumerate()
        .map(|(index, f)| Frame {
            index,
            ip: f.ip,
            sp: f.sp,
            symbol: if resolve { symbol_name(f.ip) } else { None },
        })
        .collect();

    info!("Captured {} frames (resolve={})", frames.len(), resolve);

    frames
}

/// Capture the frames of the caller and everything above it.
#[inline(never)]
pub fn capture(resolve: bool) -> Vec<Frame> {
    frames_above(capture as *const () as usize, resolve)
}

/// Print the call stack of the caller to `out`, one frame per line, and
/// return the number of frames written. The first line is the caller's
/// frame, not this function's.
#[inline(never)]
pub fn show_backtrace<W: Write>(out: &mut W, resolve: bool) -> Result<usize> {
    let frames = frames_above(show_backtrace::<W> as *const () as usize, resolve);

    if frames.is_empty() {
        return Err(KaleidoError::unwind("no frames could be unwound"));
    }

    for frame in &frames {
        writeln!(out, "{}", frame)?;
    }

    Ok(frames.len())
}
