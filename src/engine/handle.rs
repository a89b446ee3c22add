// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use tokio::sync::{mpsc, oneshot};

use crate::errors::DispatchError;
use crate::odf::ImmutableOdf;
use crate::omi::{CallRequest, OmiRequest, ReadRequest, ResponseRequest, WriteRequest};

/// Reply channel for one request.
pub(crate) type Reply = oneshot::Sender<Result<ResponseRequest, DispatchError>>;

/// A request waiting in the request loop mailbox.
pub(crate) struct Envelope {
    pub request: OmiRequest,
    pub reply: Reply,
}

/// Cloneable handle for submitting requests to the agent system.
///
/// Every agent receives one at construction and may use it to issue its own
/// writes, reads and calls. Requests are queued on the request loop mailbox
/// and answered through a per-request reply channel, so the handle never
/// touches agents or storage directly.
///
/// Once the agent system shuts down every method returns
/// [`DispatchError::SystemShutdown`].
#[derive(Clone, Debug)]
pub struct RequestHandle {
    sender: mpsc::Sender<Envelope>,
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope")
            .field("kind", &self.request.kind())
            .finish()
    }
}

impl RequestHandle {
    pub(crate) fn new(sender: mpsc::Sender<Envelope>) -> Self {
        Self { sender }
    }

    /// Handle plus the receiving end of its mailbox.
    pub(crate) fn channel(buffer: usize) -> (Self, mpsc::Receiver<Envelope>) {
        let (sender, receiver) = mpsc::channel(buffer);
        (Self::new(sender), receiver)
    }

    pub async fn request(&self, request: OmiRequest) -> Result<ResponseRequest, DispatchError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(Envelope { request, reply })
            .await
            .map_err(|_| DispatchError::SystemShutdown)?;
        response.await.map_err(|_| DispatchError::SystemShutdown)?
    }

    pub async fn write(&self, write: WriteRequest) -> Result<ResponseRequest, DispatchError> {
        self.request(write.into()).await
    }

    pub async fn read(&self, read: ReadRequest) -> Result<ResponseRequest, DispatchError> {
        self.request(read.into()).await
    }

    pub async fn call(&self, call: CallRequest) -> Result<ResponseRequest, DispatchError> {
        self.request(call.into()).await
    }

    /// Convenience for a write of `odf` issued by the named agent.
    pub async fn write_as(
        &self,
        agent: &str,
        odf: ImmutableOdf,
    ) -> Result<ResponseRequest, DispatchError> {
        self.write(WriteRequest::new(odf).from_agent(agent)).await
    }

    /// True once the request loop has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
