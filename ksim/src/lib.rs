//! Scripted stand-in for the cooperative kernel, for host tests.
//!
//! Drives code written against [`usys::Kernel`] without a board: input comes
//! from a pre-scripted byte queue, every syscall lands in an event log, and
//! other threads are modeled as output bursts the scheduler delivers to the
//! shared device exactly at yield points. Contract violations the real ABI
//! leaves undefined (receive without a subscription, double subscribe,
//! receiving past the end of the script) panic here so a broken test fails
//! loudly instead of hanging.

use std::collections::VecDeque;

use log::trace;
use usys::{Kernel, Service, DBGU};

/// One recorded boundary crossing, in program order.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Event {
    Subscribe(Service),
    Receive(u8),
    Send(u8),
    Yield,
}

pub struct SimKernel {
    input: VecDeque<u8>,
    peers: VecDeque<Vec<u8>>,
    subscribed: Vec<Service>,
    events: Vec<Event>,
    device: Vec<u8>,
}

impl SimKernel {
    pub fn new() -> Self {
        SimKernel {
            input: VecDeque::new(),
            peers: VecDeque::new(),
            subscribed: Vec::new(),
            events: Vec::new(),
            device: Vec::new(),
        }
    }

    /// A kernel whose device will deliver exactly `script`, in order.
    pub fn with_input(script: &[u8]) -> Self {
        let mut sim = Self::new();
        sim.input.extend(script.iter().copied());
        sim
    }

    /// Queue one burst of foreign output. Each yield delivers at most one
    /// queued burst to the device, front first, modeling another thread
    /// that ran while the caller was suspended.
    pub fn queue_peer_output(&mut self, bytes: &[u8]) {
        self.peers.push_back(bytes.to_vec());
    }

    /// Everything written to the shared device so far, own and foreign.
    pub fn device(&self) -> &[u8] {
        &self.device
    }

    /// Every syscall issued so far, in program order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }
}

impl Default for SimKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for SimKernel {
    fn subscribe(&mut self, service: Service) {
        trace!("sim syscall: subscribe service={}", service.0);
        if self.subscribed.contains(&service) {
            panic!("subscribe: service {} already subscribed", service.0);
        }
        self.subscribed.push(service);
        self.events.push(Event::Subscribe(service));
    }

    fn receive_char(&mut self) -> u8 {
        trace!("sim syscall: receive_char blocking");
        if !self.subscribed.contains(&DBGU) {
            panic!("receive_char: DBGU service not subscribed");
        }
        let c = match self.input.pop_front() {
            Some(c) => c,
            // a real thread would block here forever
            None => panic!("receive_char: input script exhausted"),
        };
        self.events.push(Event::Receive(c));
        c
    }

    fn send_char(&mut self, c: u8) {
        trace!("sim syscall: send_char {:#04x}", c);
        self.events.push(Event::Send(c));
        self.device.push(c);
    }

    fn yield_now(&mut self) {
        trace!("sim syscall: yield");
        self.events.push(Event::Yield);
        if let Some(burst) = self.peers.pop_front() {
            self.device.extend_from_slice(&burst);
        }
    }
}
