#![cfg_attr(not(test), no_std)]

// Command loop over the DBGU character service - can be tested on host

use usys::{send_str, Kernel, DBGU};

/// Ends the session.
pub const QUIT: u8 = b'q';
/// Runs the split emission around a yield.
pub const TRIGGER: u8 = b't';

const TIP: &str = "tip\n";
const TOP: &str = "top\n";
const REJECT: &str = "no: ";

/// The interactive loop: subscribe to the character device once, then block
/// for input and dispatch until [`QUIT`] arrives. On [`TRIGGER`] the reply
/// is split around a yield: `"tip\n"` is fully on the wire before the CPU
/// is ceded, `"top\n"` goes out only after the scheduler hands control
/// back, in program order. Every other character is echoed behind the
/// `"no: "` prefix. Returning is the clean exit; no syscall is issued after
/// the quit character has been read.
pub fn run<K: Kernel>(kernel: &mut K) {
    kernel.subscribe(DBGU);
    loop {
        let received = kernel.receive_char();
        if received == QUIT {
            break;
        }
        if received == TRIGGER {
            send_str(kernel, TIP);
            kernel.yield_now();
            send_str(kernel, TOP);
        } else {
            send_str(kernel, REJECT);
            kernel.send_char(received);
            kernel.send_char(b'\n');
        }
    }
}

/// Fixed smoke-test sequence: emit, cede the CPU once, emit again. Needs no
/// subscription and reads nothing; it exists to show the two emissions stay
/// whole and ordered across the suspension.
pub fn yield_probe<K: Kernel>(kernel: &mut K) {
    send_str(kernel, TIP);
    kernel.yield_now();
    send_str(kernel, TOP);
}
