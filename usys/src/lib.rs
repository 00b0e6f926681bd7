#![cfg_attr(not(test), no_std)]

use core::ffi::CStr;
use core::fmt;

/// A kernel service a thread can subscribe to.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Service(pub u32);

pub const DBGU: Service = Service(uapi::service::DBGU);

/* -------- syscall gateway ---------- */

/// The four kernel capabilities reachable from user space, one method per
/// trap vector (`uapi::nr`). Each call is a single indivisible boundary
/// crossing with no partial effects. Where the ABI documents no output, the
/// method returns nothing: r0 is unspecified after those traps and must
/// never be read back. There is no error channel at this boundary; an
/// invalid service id or a dead device is the kernel's to handle, and the
/// symptoms here are a receive that never returns or characters that never
/// arrive.
pub trait Kernel {
    /// `swi #34`: register the calling thread with `service`. Service id
    /// in r0, no output, returns immediately. Issue it exactly once, before
    /// the first `receive_char`; a receive without a subscription is
    /// undefined.
    fn subscribe(&mut self, service: Service);

    /// `swi #11`: receive one character from the subscribed device. Mode
    /// flag `RECV_BLOCKING` in r0 on entry, received character in r0 on
    /// return. Suspends the calling thread until a character is available.
    fn receive_char(&mut self) -> u8;

    /// `swi #10`: send one character to the device. Character in r0, no
    /// output, fire-and-forget.
    fn send_char(&mut self, c: u8);

    /// `swi #32`: cede the CPU to some other ready thread. No registers,
    /// no output. Returns whenever the scheduler picks this thread again,
    /// with no promise about when or after whom.
    fn yield_now(&mut self);
}

/* -------- string emission ---------- */

/// Send every byte of `s` in order, one syscall per byte, no buffering.
/// The empty string sends nothing.
pub fn send_str<K: Kernel>(kernel: &mut K, s: &str) {
    for b in s.bytes() {
        kernel.send_char(b);
    }
}

/// NUL-terminated variant: walk up to, not including, the terminator.
pub fn send_cstr<K: Kernel>(kernel: &mut K, s: &CStr) {
    for &b in s.to_bytes() {
        kernel.send_char(b);
    }
}

/* -------- fmt front-end ---------- */

/// `core::fmt::Write` over any [`Kernel`], for `write!`-style output.
/// Forwards each fragment straight through `send_char`.
pub struct Writer<'a, K: Kernel> {
    kernel: &'a mut K,
}

impl<'a, K: Kernel> Writer<'a, K> {
    pub fn new(kernel: &'a mut K) -> Self {
        Writer { kernel }
    }
}

impl<K: Kernel> fmt::Write for Writer<'_, K> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        send_str(self.kernel, s);
        Ok(())
    }
}

/* -------- ARM trap adapter ---------- */

#[cfg(target_arch = "arm")]
mod swi {
    use super::{Kernel, Service};
    use uapi::{is_no_char, nr, RECV_BLOCKING, RECV_POLL};

    #[inline(always)]
    unsafe fn swi_subscribe(service: u32) {
        core::arch::asm!(
            "swi #{nr}",
            nr = const nr::SUBSCRIBE,
            in("r0") service,
            options(nostack),
        );
    }

    #[inline(always)]
    unsafe fn swi_receive(mode: u32) -> u32 {
        let ret: u32;
        core::arch::asm!(
            "swi #{nr}",
            nr = const nr::RECEIVE_DBGU,
            in("r0") mode,
            lateout("r0") ret,
            options(nostack),
        );
        ret
    }

    #[inline(always)]
    unsafe fn swi_send(c: u32) {
        core::arch::asm!(
            "swi #{nr}",
            nr = const nr::SEND_DBGU,
            in("r0") c,
            options(nostack),
        );
    }

    #[inline(always)]
    unsafe fn swi_yield() {
        core::arch::asm!(
            "swi #{nr}",
            nr = const nr::YIELD,
            options(nostack),
        );
    }

    /// The real gateway: each method is one `swi` with the fixed r0
    /// convention. Zero-sized; construct it in place.
    pub struct Swi;

    impl Kernel for Swi {
        fn subscribe(&mut self, service: Service) {
            unsafe { swi_subscribe(service.0) }
        }
        fn receive_char(&mut self) -> u8 {
            unsafe { swi_receive(RECV_BLOCKING) as u8 }
        }
        fn send_char(&mut self, c: u8) {
            unsafe { swi_send(c as u32) }
        }
        fn yield_now(&mut self) {
            unsafe { swi_yield() }
        }
    }

    /// Poll-mode receive: same vector, mode flag `RECV_POLL`, `None` when
    /// the kernel answers the no-character sentinel instead of data.
    pub fn receive_char_poll() -> Option<u8> {
        let ret = unsafe { swi_receive(RECV_POLL) };
        if is_no_char(ret) {
            None
        } else {
            Some(ret as u8)
        }
    }
}

#[cfg(target_arch = "arm")]
pub use swi::{receive_char_poll, Swi};

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write as _;

    /// Records every sent byte; the other operations are inert.
    struct Recorder {
        sent: Vec<u8>,
    }

    impl Recorder {
        fn new() -> Self {
            Recorder { sent: Vec::new() }
        }
    }

    impl Kernel for Recorder {
        fn subscribe(&mut self, _service: Service) {}
        fn receive_char(&mut self) -> u8 {
            unreachable!("emission helpers never receive")
        }
        fn send_char(&mut self, c: u8) {
            self.sent.push(c);
        }
        fn yield_now(&mut self) {}
    }

    #[test]
    fn send_str_emits_one_syscall_per_byte_in_order() {
        let mut k = Recorder::new();
        send_str(&mut k, "tip\n");
        assert_eq!(k.sent, b"tip\n");
    }

    #[test]
    fn send_str_empty_emits_nothing() {
        let mut k = Recorder::new();
        send_str(&mut k, "");
        assert!(k.sent.is_empty());
    }

    #[test]
    fn send_cstr_walks_up_to_the_terminator() {
        let mut k = Recorder::new();
        let s = CStr::from_bytes_with_nul(b"no: \0").unwrap();
        send_cstr(&mut k, s);
        assert_eq!(k.sent, b"no: ");
    }

    #[test]
    fn send_cstr_empty_emits_nothing() {
        let mut k = Recorder::new();
        let s = CStr::from_bytes_with_nul(b"\0").unwrap();
        send_cstr(&mut k, s);
        assert!(k.sent.is_empty());
    }

    #[test]
    fn writer_forwards_formatted_output_unbuffered() {
        let mut k = Recorder::new();
        let mut w = Writer::new(&mut k);
        let _ = write!(w, "no: {}", 'x');
        assert_eq!(k.sent, b"no: x");
    }
}
