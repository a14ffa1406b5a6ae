use std::cell::RefCell;

thread_local! {
    static CALLS: RefCell<Vec<(&'static str, usize)>> = const { RefCell::new(Vec::new()) };
}

/// Record a call to a table procedure on this thread.
pub fn record(name: &'static str, addr: *mut u8) {
    CALLS.with_borrow_mut(|calls| calls.push((name, addr as usize)));
}

/// Drain this thread's recorded calls.
pub fn take_calls() -> Vec<(&'static str, usize)> {
    CALLS.take()
}

pub fn take_call_names() -> Vec<&'static str> {
    take_calls().into_iter().map(|(name, _)| name).collect()
}

/// Define a procedure entry point that only records its calls.
macro_rules! recording_proc {
    ($name:ident) => {
        unsafe extern "C" fn $name(addr: *mut u8) {
            $crate::test_utils::record(stringify!($name), addr);
        }
    };
}

pub(crate) use recording_proc;
