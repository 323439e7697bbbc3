use crate::events::Event;
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub trait EventHandler: Clone + Send + Sized + 'static {
    type Err;
    type Future: Future<Output = Result<(), Self::Err>> + Send;

    fn handle_event(self, event: Event) -> Self::Future;
}

impl<F, Fut, Err> EventHandler for F
where
    F: FnOnce(Event) -> Fut,
    F: Clone + Send + 'static,
    Fut: Future<Output = Result<(), Err>> + Send + 'static,
{
    type Err = Err;
    type Future = Fut;

    fn handle_event(self, event: Event) -> Self::Future {
        self(event)
    }
}

type BoxedHandleEvent<E> = Pin<Box<dyn Future<Output = Result<(), E>> + Send>>;

type OwnedEventHandlerFn<E> = dyn Fn(Event) -> BoxedHandleEvent<E> + Send + Sync;

/// A type erased [EventHandler]
#[must_use]
pub struct OwnedEventHandler<E = Infallible> {
    func: Arc<OwnedEventHandlerFn<E>>,
}

impl<E> Clone for OwnedEventHandler<E> {
    fn clone(&self) -> Self {
        Self {
            func: self.func.clone(),
        }
    }
}

impl<E: 'static> OwnedEventHandler<E> {
    pub(crate) fn new<F>(func: F) -> Self
    where
        F: EventHandler<Err = E> + Sync,
        F::Future: 'static,
    {
        let func = Arc::new(move |event: Event| {
            let future = func.clone().handle_event(event);
            Box::pin(future) as BoxedHandleEvent<E>
        });
        Self { func }
    }
}

impl<E: 'static> EventHandler for OwnedEventHandler<E> {
    type Err = E;
    type Future = BoxedHandleEvent<E>;

    fn handle_event(self, event: Event) -> Self::Future {
        (self.func)(event)
    }
}

pub fn handle_event<F, Fut, E>(func: F) -> OwnedEventHandler<E>
where
    F: FnOnce(Event) -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: 'static,
{
    OwnedEventHandler::new(func)
}
