//! Binary operation adapters.
//!
//! An adapter carries one operation in two call forms, [`BinaryOp::on_host`]
//! and [`BinaryOp::on_device`], which must agree. Both forms accept either
//! two scalars or two whole batches, so the driver can derive the reference
//! result lane by lane and the computed result in one vector operation.
//! Covering a new operation means adding an adapter here.

use std::ops::{Add, Div, Mul, Sub};

/// Values an adapter can combine: scalar elements and batches.
pub trait Operand:
    Copy + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> + Div<Output = Self>
{
}

impl<X> Operand for X where
    X: Copy + Add<Output = X> + Sub<Output = X> + Mul<Output = X> + Div<Output = X>
{
}

pub trait BinaryOp: Copy + Send + Sync {
    const NAME: &'static str;

    fn on_host<X: Operand>(&self, a: X, b: X) -> X;

    fn on_device<X: Operand>(&self, a: X, b: X) -> X;
}

/// `a + b`.
#[derive(Copy, Clone, Debug, Default)]
pub struct Plus;

impl BinaryOp for Plus {
    const NAME: &'static str = "plus";

    #[inline(always)]
    fn on_host<X: Operand>(&self, a: X, b: X) -> X {
        a + b
    }

    #[inline(always)]
    fn on_device<X: Operand>(&self, a: X, b: X) -> X {
        a + b
    }
}
