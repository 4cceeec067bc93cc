//! Native callables of every arity behind one interface.
//!
//! The binders take plain Rust closures and function items. These traits
//! let them treat `Fn(A, B) -> T`, `Fn(&T, A) -> R` and `Fn(&mut T) -> R`
//! uniformly: the argument list becomes an [`ArgTuple`](crate::ArgTuple)
//! type parameter, spread back into positional arguments on invocation.

/// A function building a `T` from an argument tuple.
pub trait Constructor<Args, T>: Send + Sync + 'static {
    fn construct(&self, args: Args) -> T;
}

/// A function taking a shared receiver.
pub trait Method<T, Args, Ret>: Send + Sync + 'static {
    fn invoke(&self, this: &T, args: Args) -> Ret;
}

/// A function taking an exclusive receiver.
pub trait MethodMut<T, Args, Ret>: Send + Sync + 'static {
    fn invoke_mut(&self, this: &mut T, args: Args) -> Ret;
}

macro_rules! impl_callables {
    ($($A:ident $a:ident),*) => {
        impl<Func, T, $($A,)*> Constructor<($($A,)*), T> for Func
        where
            Func: Fn($($A),*) -> T + Send + Sync + 'static,
        {
            fn construct(&self, ($($a,)*): ($($A,)*)) -> T {
                (self)($($a),*)
            }
        }

        impl<Func, T, Ret, $($A,)*> Method<T, ($($A,)*), Ret> for Func
        where
            Func: Fn(&T, $($A),*) -> Ret + Send + Sync + 'static,
        {
            fn invoke(&self, this: &T, ($($a,)*): ($($A,)*)) -> Ret {
                (self)(this, $($a),*)
            }
        }

        impl<Func, T, Ret, $($A,)*> MethodMut<T, ($($A,)*), Ret> for Func
        where
            Func: Fn(&mut T, $($A),*) -> Ret + Send + Sync + 'static,
        {
            fn invoke_mut(&self, this: &mut T, ($($a,)*): ($($A,)*)) -> Ret {
                (self)(this, $($a),*)
            }
        }
    };
}

impl_callables!();
impl_callables!(A a);
impl_callables!(A a, B b);
impl_callables!(A a, B b, C c);
impl_callables!(A a, B b, C c, D d);
impl_callables!(A a, B b, C c, D d, E e);
impl_callables!(A a, B b, C c, D d, E e, F f);
impl_callables!(A a, B b, C c, D d, E e, F f, G g);
impl_callables!(A a, B b, C c, D d, E e, F f, G g, H h);
