//! Shared test infrastructure for seeknobs integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};
use seeknobs::{Expander, Rgb24};

// ============================================================================
// Mock Expander
// ============================================================================

/// Which transaction a mock call represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    Analog(u8),
    DigitalBulk(u32),
    Frame,
}

/// Mock expander with scripted pin levels that records every transaction
pub struct MockExpander {
    analog: [u16; 32],
    buttons: u32,
    log: heapless::Vec<Transaction, 256>,
    last_frame: heapless::Vec<Rgb24, 16>,
    fail_analog: bool,
    fail_digital: bool,
    fail_frame: bool,
}

impl MockExpander {
    /// All analog pins at zero, every button released
    pub fn new() -> Self {
        Self {
            analog: [0; 32],
            buttons: u32::MAX,
            log: heapless::Vec::new(),
            last_frame: heapless::Vec::new(),
            fail_analog: false,
            fail_digital: false,
            fail_frame: false,
        }
    }

    pub fn set_analog(&mut self, pin: u8, value: u16) {
        self.analog[pin as usize] = value;
    }

    /// Drive a button pin low (pressed) or high (released)
    pub fn set_button(&mut self, pin: u8, pressed: bool) {
        if pressed {
            self.buttons &= !(1 << pin);
        } else {
            self.buttons |= 1 << pin;
        }
    }

    pub fn fail_analog(&mut self, fail: bool) {
        self.fail_analog = fail;
    }

    pub fn fail_digital(&mut self, fail: bool) {
        self.fail_digital = fail;
    }

    pub fn fail_frame(&mut self, fail: bool) {
        self.fail_frame = fail;
    }

    pub fn log(&self) -> &[Transaction] {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    pub fn last_frame(&self) -> &[Rgb24] {
        &self.last_frame
    }

    pub fn frames_pushed(&self) -> usize {
        self.log.iter().filter(|t| **t == Transaction::Frame).count()
    }

    fn record(&mut self, transaction: Transaction) {
        self.log.push(transaction).expect("transaction log full");
    }
}

/// Error returned by the mock when a failure is scripted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

impl Expander for MockExpander {
    type Error = MockError;

    fn analog_read(&mut self, pin: u8) -> Result<u16, MockError> {
        self.record(Transaction::Analog(pin));
        if self.fail_analog {
            return Err(MockError);
        }
        Ok(self.analog[pin as usize])
    }

    fn digital_read_bulk(&mut self, mask: u32) -> Result<u32, MockError> {
        self.record(Transaction::DigitalBulk(mask));
        if self.fail_digital {
            return Err(MockError);
        }
        Ok(self.buttons & mask)
    }

    fn push_frame(&mut self, frame: &[Rgb24]) -> Result<(), MockError> {
        self.record(Transaction::Frame);
        if self.fail_frame {
            return Err(MockError);
        }
        self.last_frame.clear();
        self.last_frame
            .extend_from_slice(frame)
            .expect("frame larger than mock capacity");
        Ok(())
    }
}

// ============================================================================
// Mock I2C bus
// ============================================================================

/// Mock I2C bus that records writes and answers reads from a script
pub struct MockI2c {
    pub writes: Vec<(u8, Vec<u8>)>,
    pub reads: Vec<u8>,
    responses: std::collections::VecDeque<Result<Vec<u8>, ErrorKind>>,
    fail_writes: bool,
}

impl MockI2c {
    pub fn new() -> Self {
        Self {
            writes: Vec::new(),
            reads: Vec::new(),
            responses: std::collections::VecDeque::new(),
            fail_writes: false,
        }
    }

    /// Queue the bytes returned by the next read
    pub fn respond(&mut self, bytes: &[u8]) {
        self.responses.push_back(Ok(bytes.to_vec()));
    }

    /// Queue a NACK for the next read
    pub fn respond_nack(&mut self) {
        self.responses.push_back(Err(ErrorKind::NoAcknowledge(
            embedded_hal::i2c::NoAcknowledgeSource::Address,
        )));
    }

    /// Make every write NACK
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Writes that were sent to the given register, payload only
    pub fn writes_to(&self, module: u8, register: u8) -> Vec<Vec<u8>> {
        self.writes
            .iter()
            .filter(|(_, bytes)| bytes.len() >= 2 && bytes[0] == module && bytes[1] == register)
            .map(|(_, bytes)| bytes[2..].to_vec())
            .collect()
    }
}

impl ErrorType for MockI2c {
    type Error = ErrorKind;
}

impl I2c for MockI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    if self.fail_writes {
                        return Err(ErrorKind::NoAcknowledge(
                            embedded_hal::i2c::NoAcknowledgeSource::Address,
                        ));
                    }
                    self.writes.push((address, bytes.to_vec()));
                }
                Operation::Read(buffer) => {
                    let response = self.responses.pop_front().unwrap_or(Err(ErrorKind::Other))?;
                    assert_eq!(response.len(), buffer.len(), "scripted read length mismatch");
                    buffer.copy_from_slice(&response);
                    self.reads.extend_from_slice(&response);
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Delay
// ============================================================================

/// Delay that returns immediately and sums what was requested
pub struct MockDelay {
    pub total_ns: u64,
}

impl MockDelay {
    pub fn new() -> Self {
        Self { total_ns: 0 }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }
}
