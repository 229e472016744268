use std::{
    mem,
    ops::{Deref, DerefMut},
    ptr,
};

/// Owned C pointer, released with `dealloc` on drop unless null.
pub(crate) struct CBox<T> {
    ptr: *mut T,
    dealloc: fn(*mut T),
}

impl<T> CBox<T> {
    pub(crate) fn new(ptr: *mut T, dealloc: fn(*mut T)) -> Self {
        Self { ptr, dealloc }
    }
    /// Gives up ownership, leaving a null pointer behind.
    pub(crate) fn take(&mut self) -> *mut T {
        mem::replace(&mut self.ptr, ptr::null_mut())
    }
}

impl<T> Drop for CBox<T> {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            (self.dealloc)(self.ptr);
        }
    }
}

impl<T> Deref for CBox<T> {
    type Target = *mut T;

    fn deref(&self) -> &Self::Target {
        &self.ptr
    }
}

impl<T> DerefMut for CBox<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.ptr
    }
}

unsafe impl<T> Send for CBox<T> {}
unsafe impl<T> Sync for CBox<T> {}

#[cfg(test)]
mod tests {
    use super::CBox;
    use std::{
        ptr,
        sync::atomic::{AtomicUsize, Ordering},
    };

    static RELEASED: AtomicUsize = AtomicUsize::new(0);

    fn release(_: *mut i32) {
        RELEASED.fetch_add(1, Ordering::Relaxed);
    }

    #[test]
    fn cbox_raw_pointer() {
        let mut v = 123;
        {
            let ptr = CBox::new(ptr::null_mut::<i32>(), release);
            assert!(ptr.is_null());
        }
        assert_eq!(RELEASED.load(Ordering::Relaxed), 0);
        {
            let ptr = CBox::new(&mut v as *mut i32, release);
            assert_eq!(unsafe { **ptr }, 123);
        }
        assert_eq!(RELEASED.load(Ordering::Relaxed), 1);
        {
            let mut ptr = CBox::new(&mut v as *mut i32, release);
            assert!(!ptr.take().is_null());
            assert!(ptr.is_null());
        }
        assert_eq!(RELEASED.load(Ordering::Relaxed), 1);
    }
}
