//! DOM listeners that translate browser input into director events.

mod keyboard;
mod page;
mod pointer;
mod touch;
mod wheel;

use std::rc::Rc;

use crate::app::App;

pub fn wire_all(app: &Rc<App>) {
    wheel::wire(app);
    touch::wire(app);
    keyboard::wire(app);
    pointer::wire(app);
    page::wire(app);
}
