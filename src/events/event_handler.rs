/// Components that react to a stream of `T` (commands into the engine, events out of it).
pub trait EventHandler<T> {
    fn handle_event(&mut self, event: &T);
}
