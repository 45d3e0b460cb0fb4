/// A named, pure rewrite from `T` to `T`.
///
/// A pass that finds nothing to rewrite hands back its input unchanged; for shared trees this
/// means the very same allocation, which is what drivers compare against to detect convergence.
pub trait Pass<T> {
    type Error;
    fn name(&self) -> &str;
    fn run(&self, input: &T) -> Result<T, Self::Error>;
}

impl<T, E, P> Pass<T> for Box<P>
where
    P: Pass<T, Error = E> + ?Sized,
{
    type Error = E;
    fn name(&self) -> &str {
        (**self).name()
    }
    fn run(&self, input: &T) -> Result<T, E> {
        (**self).run(input)
    }
}

/// A pass built from a name and a closure.
pub struct FnPass<F> {
    name: String,
    f: F,
}

impl<F> FnPass<F> {
    pub fn new(name: impl Into<String>, f: F) -> Self {
        FnPass { name: name.into(), f }
    }
}

impl<T, E, F> Pass<T> for FnPass<F>
where
    F: Fn(&T) -> Result<T, E>,
{
    type Error = E;
    fn name(&self) -> &str {
        &self.name
    }
    fn run(&self, input: &T) -> Result<T, E> {
        (self.f)(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxed_and_closure_passes() {
        let double = FnPass::new("double", |x: &i32| Ok::<_, ()>(x * 2));
        let boxed: Box<dyn Pass<i32, Error = ()>> = Box::new(double);
        assert_eq!(boxed.name(), "double");
        assert_eq!(boxed.run(&21), Ok(42));
    }
}
