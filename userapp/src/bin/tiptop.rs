#![no_std]
#![no_main]

use core::fmt::Write;
use usys::{Swi, Writer};

// The kernel's thread wrapper calls main and turns a normal return into a
// clean exit.
#[no_mangle]
pub extern "C" fn main() {
    userapp::run(&mut Swi);
}

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    let _ = writeln!(Writer::new(&mut Swi), "panic: {}", info);
    loop {}
}
