//! Recording SPI device and delay for the unit tests.

use std::collections::VecDeque;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{Error, ErrorKind, ErrorType, Operation, SpiDevice};

use crate::bus::ClockControl;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MockError;

impl Error for MockError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Records the bytes sent in every transaction and answers with queued replies.
/// Byte 0 of a reply is ignored, the chip shifts nothing back during the command byte.
#[derive(Default)]
pub struct MockSpi {
    pub sent: Vec<Vec<u8>>,
    pub clocks: Vec<u32>,
    pub replies: VecDeque<Vec<u8>>,
    pub fail: bool,
}

impl MockSpi {
    pub fn reply(mut self, bytes: &[u8]) -> Self {
        self.replies.push_back(bytes.to_vec());
        self
    }
}

impl ErrorType for MockSpi {
    type Error = MockError;
}

impl SpiDevice for MockSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        assert_eq!(operations.len(), 1);

        match &mut operations[0] {
            Operation::TransferInPlace(words) => {
                self.sent.push(words.to_vec());

                if self.fail {
                    return Err(MockError);
                }

                if let Some(reply) = self.replies.pop_front() {
                    assert_eq!(reply.len(), words.len(), "Reply length mismatch");
                    words[1..].copy_from_slice(&reply[1..]);
                }
            }
            _ => panic!("Not an expected operation"),
        }

        Ok(())
    }
}

impl ClockControl for MockSpi {
    fn set_clock_hz(&mut self, hz: u32) -> Result<(), Self::Error> {
        self.clocks.push(hz);
        Ok(())
    }
}

/// Adds up requested delays instead of sleeping.
#[derive(Default)]
pub struct MockDelay {
    pub elapsed_ns: u64,
}

impl MockDelay {
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
    }
}
