//! Formatting traits shared by the printer and the analysis dumps.

use pretty::RcDoc;

/// One-shot rendering to text, for generated code and trace dumps alike.
#[impl_tools::autoimpl(for<T: trait + ?Sized> &T, Box<T>, std::rc::Rc<T>)]
pub trait Ugly<'a, Fmter> {
    fn ugly(&self, f: &'a Fmter) -> String;
}

/// Rendering to a layout document that breaks lines only where it must.
#[impl_tools::autoimpl(for<T: trait + ?Sized> &T, Box<T>, std::rc::Rc<T>)]
pub trait Pretty<'a, Fmter> {
    fn pretty(&self, f: &'a Fmter) -> RcDoc<'a>;
    /// The document laid out at `width` columns, without leading or trailing blank space.
    fn layout(&self, f: &'a Fmter, width: usize) -> String {
        self.pretty(f).pretty(width).to_string().trim().to_string()
    }
}
