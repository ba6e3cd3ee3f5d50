//! Instruction set definitions: field extraction, the table-driven decode
//! into a fixed control record, SPR routing, and assembler helpers.

pub mod asm;
pub mod fields;
pub mod sprs;
pub mod table;

pub use sprs::SprSelect;
pub use table::{decode, CarryIn, Dest, InsnControl, MemFlags, Op, RcForm, SrcA, SrcB, SrcC, Unit};
