pub use self::as_any::AsAny;
pub use self::inner_thread::InnerThread;

mod as_any;
mod inner_thread;

#[cfg(test)]
pub(crate) mod recorder;
