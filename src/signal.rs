//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Handle returned by [`Signal::connect`], used to disconnect the handler again.
pub struct SignalId(u64);

type Handler<A> = Rc<RefCell<dyn FnMut(&A)>>;

/// List of callbacks invoked when a widget event happens.
pub struct Signal<A> {
    handlers: RefCell<Vec<(SignalId, Handler<A>)>>,
    next_id: Cell<u64>,
}

impl<A> Default for Signal<A> {
    fn default() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }
}

impl<A> Signal<A> {
    /// Signal without handlers.
    pub fn new() -> Self { Self::default() }

    /// Adds `handler`, called on every emission.
    pub fn connect<F: FnMut(&A) + 'static>(&self, handler: F) -> SignalId {
        let id = SignalId(self.next_id.get());
        self.next_id.set(self.next_id.get().wrapping_add(1));
        self.handlers.borrow_mut().push((id, Rc::new(RefCell::new(handler))));
        id
    }

    /// Removes a handler. Returns `false` if `id` was not connected.
    pub fn disconnect(&self, id: SignalId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let count = handlers.len();
        handlers.retain(|(h, _)| *h != id);
        handlers.len() != count
    }

    /// Removes every handler.
    pub fn disconnect_all(&self) { self.handlers.borrow_mut().clear() }

    /// Number of connected handlers.
    pub fn len(&self) -> usize { self.handlers.borrow().len() }

    /// Returns `true` if no handler is connected.
    pub fn is_empty(&self) -> bool { self.handlers.borrow().is_empty() }

    /// Calls every handler with `arg`, in connection order.
    ///
    /// Handlers may connect or disconnect handlers of the same signal; changes apply from the
    /// next emission. A handler that emits its own signal again is skipped for the nested call.
    pub fn emit(&self, arg: &A) {
        let handlers: Vec<Handler<A>> = self.handlers.borrow().iter().map(|(_, h)| h.clone()).collect();
        for handler in handlers {
            if let Ok(mut f) = handler.try_borrow_mut() {
                (&mut *f)(arg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_emit_disconnect() {
        let signal = Signal::<u32>::new();
        let total = Rc::new(Cell::new(0));
        let t = total.clone();
        let id = signal.connect(move |v| t.set(t.get() + *v));
        signal.emit(&3);
        signal.emit(&4);
        assert_eq!(total.get(), 7);
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.emit(&5);
        assert_eq!(total.get(), 7);
    }

    #[test]
    fn handlers_can_reconnect_during_emit() {
        let signal = Rc::new(Signal::<()>::new());
        let s = signal.clone();
        signal.connect(move |_| {
            s.connect(|_| ());
        });
        signal.emit(&());
        assert_eq!(signal.len(), 2);
    }
}
