// implemented by owners of subscriptions whose callbacks hold an Rc back to the owner; the cycle is only broken by calling destroy
pub trait Destroyable {
    fn destroy(&mut self);
}
