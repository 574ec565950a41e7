//! Integration tests for the WebSocket transport.
//!
//! These tests spin up a real listener and dial it with the real connector,
//! so frames actually cross a TCP socket.

#[cfg(feature = "websocket")]
mod websocket {
    use gambit_transport::{
        Connection, Connector, Transport, TransportError, WebSocketConnector,
        WebSocketTransport,
    };

    /// Binds a transport on a random port and returns it with its URL.
    async fn listen() -> (WebSocketTransport, String) {
        let transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("should have local addr");
        (transport, format!("ws://{addr}"))
    }

    #[tokio::test]
    async fn test_connector_and_transport_exchange_text_frames() {
        let (mut transport, url) = listen().await;

        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });

        let client = WebSocketConnector
            .connect(&url, &[])
            .await
            .expect("client should connect");
        let server = server_handle.await.expect("task should complete");

        assert!(server.id().into_inner() > 0);
        assert_ne!(server.id(), client.id());

        // --- Client sends, server receives ---
        client.send("PAIR").await.expect("send should succeed");
        let received = server
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have a frame");
        assert_eq!(received, "PAIR");

        // --- Server sends, client receives ---
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        server.send(fen).await.expect("send should succeed");
        let received = client.recv().await.unwrap().unwrap();
        assert_eq!(received, fen);
    }

    #[tokio::test]
    async fn test_recv_returns_none_after_peer_closes() {
        let (mut transport, url) = listen().await;
        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });

        let client = WebSocketConnector.connect(&url, &[]).await.unwrap();
        let server = server_handle.await.unwrap();

        client.close().await.expect("close should succeed");

        let result = server.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }

    #[tokio::test]
    async fn test_connect_with_subprotocols_is_accepted() {
        // The listener echoes the first offered sub-protocol; without that
        // the client would reject the handshake.
        let (mut transport, url) = listen().await;
        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });

        let protocols = vec!["gambit.v1".to_string(), "chess".to_string()];
        let client = WebSocketConnector
            .connect(&url, &protocols)
            .await
            .expect("handshake with sub-protocols should succeed");
        let server = server_handle.await.unwrap();

        client.send("COLOR_B").await.unwrap();
        assert_eq!(server.recv().await.unwrap().as_deref(), Some("COLOR_B"));
    }

    #[tokio::test]
    async fn test_connect_to_closed_port_returns_connect_failed() {
        // Bind then drop to get a port that is (almost certainly) free.
        let (transport, url) = listen().await;
        drop(transport);

        let result = WebSocketConnector.connect(&url, &[]).await;
        assert!(matches!(result, Err(TransportError::ConnectFailed { .. })));
    }

    #[tokio::test]
    async fn test_connect_with_garbage_address_returns_invalid_target() {
        let result = WebSocketConnector.connect("not a url", &[]).await;
        assert!(matches!(result, Err(TransportError::InvalidTarget(_))));
    }
}
