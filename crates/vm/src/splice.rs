//! Instruction authoring.
//!
//! [`VM::splice`] is the only way to build a program besides the lazy
//! function definition performed by calls. It validates operand cell
//! shapes against what the operation will need at run time, then
//! overwrites the active frame's current node in place. All continuation
//! handles of the new node point at fresh `Nop` placeholders.

use crate::error::{AuthoringError, VmTrap};
use crate::machine::VM;
use bmac_common::{Address, Cell, DataOp, GridIndex, InstrId, Instruction, Operation};
use tracing::{debug, warn};

impl VM {
    /// Record `op` with operands `src` and `dst` at the current node.
    ///
    /// Returns the handle of the rewritten node. Recording `Nop` changes
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AuthoringError`] if an operand has the wrong cell shape,
    /// cannot be resolved, or `Return` is requested in the root frame. The
    /// program is unchanged in that case.
    pub fn splice(
        &mut self,
        src: Address,
        dst: Address,
        op: Operation,
    ) -> Result<InstrId, AuthoringError> {
        let slot = self.current_instruction_id();
        let instruction = match self.build(src, dst, op) {
            Ok(Some(instruction)) => instruction,
            Ok(None) => return Ok(slot),
            Err(err) => {
                warn!(%op, %src, %dst, %err, "splice rejected");
                return Err(err);
            }
        };

        self.graph.replace(slot, instruction);
        debug!(%slot, %op, %src, %dst, "spliced instruction");
        Ok(slot)
    }

    /// Validate operands and build the node, allocating its placeholders.
    fn build(
        &mut self,
        src: Address,
        dst: Address,
        op: Operation,
    ) -> Result<Option<Instruction>, AuthoringError> {
        if let Some(data_op) = op.data_op() {
            self.check_data_operands(data_op, &src, &dst)?;
            return Ok(Some(Instruction::Data {
                op: data_op,
                src,
                dst,
                next: self.graph.alloc_nop(),
            }));
        }

        if let Some(cmp) = op.comparison() {
            expect_data(self.operand(&src)?)?;
            expect_data(self.operand(&dst)?)?;
            return Ok(Some(Instruction::Branch {
                cmp,
                left: src,
                right: dst,
                if_true: self.graph.alloc_nop(),
                if_false: self.graph.alloc_nop(),
            }));
        }

        match op {
            Operation::CallWithLink | Operation::Jump => {
                let (at, cell) = self.operand(&src)?;
                if cell.is_some_and(|c| !c.is_code()) {
                    return Err(AuthoringError::ExpectedCodeOrEmpty { at });
                }
                self.operand(&dst)?;
                // Pin the function to the cell picked now, whatever frame calls it later.
                let target = src.to_global(self.current_origin());
                Ok(Some(if op == Operation::Jump {
                    Instruction::Jump {
                        target,
                        origin: dst,
                    }
                } else {
                    Instruction::Call {
                        target,
                        origin: dst,
                        link: self.graph.alloc_nop(),
                    }
                }))
            }
            Operation::Return => {
                if self.depth() < 2 {
                    return Err(AuthoringError::ReturnFromRoot);
                }
                Ok(Some(Instruction::Return))
            }
            _ => Ok(None),
        }
    }

    fn check_data_operands(
        &self,
        op: DataOp,
        src: &Address,
        dst: &Address,
    ) -> Result<(), AuthoringError> {
        let src = self.operand(src)?;
        let dst = self.operand(dst)?;
        match op {
            DataOp::AddressOf => Ok(()),
            DataOp::Move => expect_occupied(src),
            DataOp::Shift => {
                expect_data(src)?;
                expect_address(dst)
            }
            DataOp::Read => expect_address(src),
            DataOp::Write => {
                expect_occupied(src)?;
                expect_address(dst)
            }
            DataOp::Add
            | DataOp::Subtract
            | DataOp::Multiply
            | DataOp::Divide
            | DataOp::Modulo => {
                expect_data(src)?;
                expect_data(dst)
            }
        }
    }

    /// The resolved coordinate and current content of an operand.
    fn operand(&self, addr: &Address) -> Result<(GridIndex, Option<Cell>), VmTrap> {
        let at = self.resolve(addr)?;
        Ok((at, self.memory.read_at(at)))
    }
}

fn expect_occupied((at, cell): (GridIndex, Option<Cell>)) -> Result<(), AuthoringError> {
    cell.map(|_| ()).ok_or(AuthoringError::EmptyOperand { at })
}

fn expect_data((at, cell): (GridIndex, Option<Cell>)) -> Result<(), AuthoringError> {
    match cell {
        Some(Cell::Data(_)) => Ok(()),
        _ => Err(AuthoringError::ExpectedData { at }),
    }
}

fn expect_address((at, cell): (GridIndex, Option<Cell>)) -> Result<(), AuthoringError> {
    match cell {
        Some(Cell::AddressRef(_)) => Ok(()),
        _ => Err(AuthoringError::ExpectedAddress { at }),
    }
}
