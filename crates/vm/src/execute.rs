//! The single-step transition function.
//!
//! Every handler performs all of its checks before its first mutation, so
//! a trap leaves the machine exactly as the previous step left it.

use crate::context::ExecutionContext;
use crate::error::VmTrap;
use crate::machine::VM;
use bmac_common::{Address, Cell, Comparison, DataOp, GridIndex, InstrId, Instruction};
use tracing::{debug, trace, warn};

impl VM {
    /// Execute exactly one instruction of the active frame.
    ///
    /// Returns `Ok(false)` when the instruction is a `Nop` (halted/idle) and
    /// `Ok(true)` after any other transition.
    ///
    /// # Errors
    ///
    /// Returns a [`VmTrap`] if the instruction's operands violate its
    /// contract. No state is changed in that case.
    pub fn execute(&mut self) -> Result<bool, VmTrap> {
        let id = self.current_instruction_id();
        let instr = self.fetch()?;
        trace!(%id, op = %instr.operation(), depth = self.depth(), "step");

        let result = match instr {
            Instruction::Nop => return Ok(false),
            Instruction::Data { op, src, dst, next } => self.exec_data(op, &src, &dst, next),
            Instruction::Branch {
                cmp,
                left,
                right,
                if_true,
                if_false,
            } => self.exec_branch(cmp, &left, &right, if_true, if_false),
            Instruction::Call {
                target,
                origin,
                link,
            } => self.exec_call(&target, &origin, link),
            Instruction::Jump { target, origin } => self.exec_jump(&target, &origin),
            Instruction::Return => self.exec_return(),
        };

        match result {
            Ok(()) => Ok(true),
            Err(trap) => {
                warn!(%id, op = %instr.operation(), %trap, "step trapped");
                Err(trap)
            }
        }
    }

    // ---- Operand access ----

    fn data_at(&self, at: GridIndex) -> Result<f64, VmTrap> {
        match self.memory.read_at(at) {
            Some(Cell::Data(value)) => Ok(value),
            Some(_) => Err(VmTrap::NotDataCell { at }),
            None => Err(VmTrap::EmptyCell { at }),
        }
    }

    fn address_at(&self, at: GridIndex) -> Result<Address, VmTrap> {
        match self.memory.read_at(at) {
            Some(Cell::AddressRef(addr)) => Ok(addr),
            _ => Err(VmTrap::NotAnAddressCell { at }),
        }
    }

    fn occupied_at(&self, at: GridIndex) -> Result<Cell, VmTrap> {
        self.memory.read_at(at).ok_or(VmTrap::EmptyCell { at })
    }

    /// Commit a straight-line step: clear the flag and move to `next`.
    fn finish(&mut self, next: InstrId) {
        self.flag = None;
        self.contexts.top_mut().advance(next);
    }

    // ---- Data operations ----

    fn exec_data(
        &mut self,
        op: DataOp,
        src: &Address,
        dst: &Address,
        next: InstrId,
    ) -> Result<(), VmTrap> {
        let src_at = self.resolve(src)?;
        let dst_at = self.resolve(dst)?;

        let (at, cell) = match op {
            DataOp::AddressOf => (dst_at, Some(Cell::AddressRef(Address::global(src_at)))),
            DataOp::Move => (dst_at, Some(self.occupied_at(src_at)?)),
            DataOp::Shift => {
                let ptr = self.address_at(dst_at)?;
                let offset = shift_offset(self.data_at(src_at)?, src_at)?;
                let coords = ptr
                    .coords
                    .checked_add(GridIndex::new(0, offset))
                    .ok_or(VmTrap::AddressOutOfRange { at: dst_at })?;
                (dst_at, Some(Cell::AddressRef(Address { coords, ..ptr })))
            }
            DataOp::Read => {
                let ptr = self.address_at(src_at)?;
                (dst_at, self.memory.read_at(self.pointee(&ptr, src_at)?))
            }
            DataOp::Write => {
                let ptr = self.address_at(dst_at)?;
                let cell = self.occupied_at(src_at)?;
                (self.pointee(&ptr, dst_at)?, Some(cell))
            }
            DataOp::Add => self.arithmetic(Arithmetic::Add, src_at, dst_at)?,
            DataOp::Subtract => self.arithmetic(Arithmetic::Subtract, src_at, dst_at)?,
            DataOp::Multiply => self.arithmetic(Arithmetic::Multiply, src_at, dst_at)?,
            DataOp::Divide => self.arithmetic(Arithmetic::Divide, src_at, dst_at)?,
            DataOp::Modulo => self.arithmetic(Arithmetic::Modulo, src_at, dst_at)?,
        };

        // An empty pointee makes READ a no-op store.
        if let Some(cell) = cell {
            self.memory.write_at(at, cell);
        }
        self.finish(next);
        Ok(())
    }

    /// `dst = dst op src`, as the cell to store and where.
    fn arithmetic(
        &self,
        op: Arithmetic,
        src_at: GridIndex,
        dst_at: GridIndex,
    ) -> Result<(GridIndex, Option<Cell>), VmTrap> {
        let rhs = self.data_at(src_at)?;
        let lhs = self.data_at(dst_at)?;
        let value = op
            .apply(lhs, rhs)
            .ok_or(VmTrap::DivisionByZero { at: src_at })?;
        Ok((dst_at, Some(Cell::Data(value))))
    }

    // ---- Control flow ----

    fn exec_branch(
        &mut self,
        cmp: Comparison,
        left: &Address,
        right: &Address,
        if_true: InstrId,
        if_false: InstrId,
    ) -> Result<(), VmTrap> {
        let left = self.data_at(self.resolve(left)?)?;
        let right = self.data_at(self.resolve(right)?)?;
        let taken = cmp.holds(left, right);

        self.flag = Some(taken);
        self.contexts
            .top_mut()
            .advance(if taken { if_true } else { if_false });
        Ok(())
    }

    fn exec_call(&mut self, target: &Address, origin: &Address, link: InstrId) -> Result<(), VmTrap> {
        let target_at = self.resolve(target)?;
        let origin_at = self.resolve(origin)?;
        let entry = self.define_function(target_at);

        self.finish(link);
        self.contexts
            .push(ExecutionContext::new(origin_at, target_at, entry));
        debug!(target = %target_at, origin = %origin_at, depth = self.depth(), "context pushed");
        Ok(())
    }

    fn exec_jump(&mut self, target: &Address, origin: &Address) -> Result<(), VmTrap> {
        let target_at = self.resolve(target)?;
        let origin_at = self.resolve(origin)?;
        let entry = self.define_function(target_at);

        self.flag = None;
        *self.contexts.top_mut() = ExecutionContext::new(origin_at, target_at, entry);
        debug!(target = %target_at, origin = %origin_at, "context retargeted");
        Ok(())
    }

    fn exec_return(&mut self) -> Result<(), VmTrap> {
        let frame = self.contexts.pop().ok_or(VmTrap::ReturnFromRoot)?;
        self.flag = None;
        debug!(target = %frame.target, depth = self.depth(), "context popped");
        Ok(())
    }
}

/// Column offset for a pointer shift: the floor of `amount`.
fn shift_offset(amount: f64, at: GridIndex) -> Result<i64, VmTrap> {
    if !amount.is_finite() {
        return Err(VmTrap::NonFiniteShift { at });
    }
    let whole = amount.floor();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    if whole < i64::MIN as f64 || whole >= i64::MAX as f64 {
        return Err(VmTrap::AddressOutOfRange { at });
    }
    Ok(whole as i64)
}

/// The arithmetic subset of [`DataOp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arithmetic {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl Arithmetic {
    /// Apply as `lhs op rhs`.
    ///
    /// Division truncates toward zero. Modulo divides by the floor of `rhs`
    /// and keeps the sign of `lhs`. Returns `None` for a zero divisor.
    fn apply(self, lhs: f64, rhs: f64) -> Option<f64> {
        match self {
            Arithmetic::Add => Some(lhs + rhs),
            Arithmetic::Subtract => Some(lhs - rhs),
            Arithmetic::Multiply => Some(lhs * rhs),
            Arithmetic::Divide if rhs == 0.0 => None,
            Arithmetic::Divide => Some((lhs / rhs).trunc()),
            Arithmetic::Modulo => {
                let divisor = rhs.floor();
                if divisor == 0.0 {
                    None
                } else {
                    Some(lhs % divisor)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divide_truncates_toward_zero() {
        assert_eq!(Arithmetic::Divide.apply(7.0, 2.0), Some(3.0));
        assert_eq!(Arithmetic::Divide.apply(-7.0, 2.0), Some(-3.0));
        assert_eq!(Arithmetic::Divide.apply(7.0, -2.0), Some(-3.0));
    }

    #[test]
    fn modulo_floors_divisor_and_keeps_dividend_sign() {
        assert_eq!(Arithmetic::Modulo.apply(7.0, 3.0), Some(1.0));
        assert_eq!(Arithmetic::Modulo.apply(7.0, 3.9), Some(1.0));
        assert_eq!(Arithmetic::Modulo.apply(-7.0, 3.0), Some(-1.0));
        assert_eq!(Arithmetic::Modulo.apply(7.0, -2.5), Some(1.0));
    }

    #[test]
    fn zero_divisor_is_none() {
        assert_eq!(Arithmetic::Divide.apply(1.0, 0.0), None);
        assert_eq!(Arithmetic::Modulo.apply(1.0, 0.5), None);
    }

    #[test]
    fn shift_offset_floors_and_checks_range() {
        let at = GridIndex::new(0, 2);
        assert_eq!(shift_offset(2.7, at), Ok(2));
        assert_eq!(shift_offset(-0.5, at), Ok(-1));
        assert_eq!(shift_offset(-9.223_372_036_854_775_808e18, at), Ok(i64::MIN));
        assert_eq!(shift_offset(9.3e18, at), Err(VmTrap::AddressOutOfRange { at }));
        assert_eq!(shift_offset(-1.0e300, at), Err(VmTrap::AddressOutOfRange { at }));
        assert_eq!(shift_offset(f64::NAN, at), Err(VmTrap::NonFiniteShift { at }));
        assert_eq!(shift_offset(f64::INFINITY, at), Err(VmTrap::NonFiniteShift { at }));
    }

    #[test]
    fn add_subtract_multiply() {
        assert_eq!(Arithmetic::Add.apply(2.0, 3.0), Some(5.0));
        assert_eq!(Arithmetic::Subtract.apply(2.0, 3.0), Some(-1.0));
        assert_eq!(Arithmetic::Multiply.apply(2.0, 3.0), Some(6.0));
    }
}
