#![no_std]
#![no_main]

use core::fmt::Write;
use usys::{Swi, Writer};

// No subscription and no loop: one fixed emit/yield/emit sequence, then
// return. Both lines must come out whole and in order no matter what other
// threads print while this one is suspended.
#[no_mangle]
pub extern "C" fn main() {
    userapp::yield_probe(&mut Swi);
}

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    let _ = writeln!(Writer::new(&mut Swi), "panic: {}", info);
    loop {}
}
