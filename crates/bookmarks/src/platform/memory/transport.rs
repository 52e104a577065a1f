//! A transport whose responses are handed in by the caller.
//!
//! Every request stays pending until [`ScriptedTransport::respond`] or
//! [`ScriptedTransport::fail`] resolves it, so the order in which
//! continuations run is fully under the caller's control.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures_channel::oneshot;

use crate::error::ClientError;
use crate::page::Transport;
use crate::request::{Request, Response};

type Reply = Result<Response, ClientError>;

#[derive(Clone, Debug, Default)]
pub struct ScriptedTransport {
    state: Rc<RefCell<TransportState>>,
}

#[derive(Debug, Default)]
struct TransportState {
    requests: Vec<Request>,
    /// Indexed like `requests`; taken once answered.
    replies: Vec<Option<oneshot::Sender<Reply>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request sent so far, answered or not.
    pub fn requests(&self) -> Vec<Request> {
        self.state.borrow().requests.clone()
    }

    pub fn unanswered(&self) -> usize {
        self.state
            .borrow()
            .replies
            .iter()
            .filter(|reply| reply.is_some())
            .count()
    }

    /// Resolves request `index` with a `200` response carrying `body`.
    pub fn respond(&self, index: usize, body: impl Into<String>) {
        self.resolve(index, Ok(Response::ok(body)));
    }

    pub fn respond_with(&self, index: usize, response: Response) {
        self.resolve(index, Ok(response));
    }

    /// Resolves request `index` as a transport failure.
    pub fn fail(&self, index: usize, message: impl Into<String>) {
        self.resolve(index, Err(ClientError::Transport(message.into())));
    }

    fn resolve(&self, index: usize, reply: Reply) {
        let sender = self
            .state
            .borrow_mut()
            .replies
            .get_mut(index)
            .and_then(Option::take);
        match sender {
            // The continuation may already be gone; nothing to deliver then.
            Some(sender) => {
                let _ = sender.send(reply);
            }
            None => panic!("request {index} was never sent or is already answered"),
        }
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: Request) -> impl Future<Output = Reply> + 'static {
        let (sender, receiver) = oneshot::channel();
        let mut state = self.state.borrow_mut();
        state.requests.push(request);
        state.replies.push(Some(sender));
        async move {
            receiver
                .await
                .unwrap_or_else(|_| Err(ClientError::Transport("request abandoned".to_string())))
        }
    }
}
