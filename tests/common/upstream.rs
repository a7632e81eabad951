use super::client::encode;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::Record;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::task::JoinHandle;

#[derive(Default)]
struct Zone {
    answers: HashMap<String, Vec<Record>>,
    additionals: HashMap<String, Vec<Record>>,
    truncate_udp: bool,
    seen: Vec<(Message, &'static str)>,
}

/// Upstream resolver double: canned answers per question name, NXDOMAIN otherwise.
pub struct MockUpstream {
    addr: SocketAddr,
    zone: Arc<Mutex<Zone>>,
    tasks: Vec<JoinHandle<()>>,
}

impl MockUpstream {
    pub async fn start() -> Self {
        let udp = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = udp.local_addr().unwrap();
        let tcp = TcpListener::bind(addr).await.unwrap();
        let zone = Arc::new(Mutex::new(Zone::default()));

        let tasks = vec![
            tokio::spawn(serve_udp(udp, zone.clone())),
            tokio::spawn(serve_tcp(tcp, zone.clone())),
        ];

        Self { addr, zone, tasks }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn answer(&self, name: &str, records: Vec<Record>) {
        self.zone
            .lock()
            .unwrap()
            .answers
            .insert(name.to_ascii_lowercase(), records);
    }

    pub fn additional(&self, name: &str, records: Vec<Record>) {
        self.zone
            .lock()
            .unwrap()
            .additionals
            .insert(name.to_ascii_lowercase(), records);
    }

    /// Answer every UDP query with an empty TC reply.
    pub fn truncate_udp(&self) {
        self.zone.lock().unwrap().truncate_udp = true;
    }

    /// Every query received so far, with the transport it arrived on.
    pub fn seen(&self) -> Vec<(Message, &'static str)> {
        self.zone.lock().unwrap().seen.clone()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

async fn serve_udp(socket: UdpSocket, zone: Arc<Mutex<Zone>>) {
    let mut buf = vec![0u8; 4096];
    while let Ok((len, peer)) = socket.recv_from(&mut buf).await {
        if let Some(reply) = respond(&buf[..len], &zone, "UDP") {
            let _ = socket.send_to(&reply, peer).await;
        }
    }
}

async fn serve_tcp(listener: TcpListener, zone: Arc<Mutex<Zone>>) {
    while let Ok((mut stream, _)) = listener.accept().await {
        let zone = zone.clone();
        tokio::spawn(async move {
            loop {
                let mut len_buf = [0u8; 2];
                if stream.read_exact(&mut len_buf).await.is_err() {
                    return;
                }
                let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
                if stream.read_exact(&mut query).await.is_err() {
                    return;
                }
                let Some(reply) = respond(&query, &zone, "TCP") else {
                    return;
                };
                let len = (reply.len() as u16).to_be_bytes();
                if stream.write_all(&len).await.is_err() || stream.write_all(&reply).await.is_err() {
                    return;
                }
            }
        });
    }
}

fn respond(bytes: &[u8], zone: &Mutex<Zone>, transport: &'static str) -> Option<Vec<u8>> {
    let query = Message::from_vec(bytes).ok()?;
    let mut zone = zone.lock().unwrap();
    zone.seen.push((query.clone(), transport));

    let mut reply = Message::new(query.id(), MessageType::Response, query.op_code());
    reply.set_recursion_desired(query.recursion_desired());
    reply.set_recursion_available(true);
    reply.add_queries(query.queries().to_vec());

    if zone.truncate_udp && transport == "UDP" {
        reply.set_truncated(true);
        return Some(encode(&reply));
    }

    let name = query
        .queries()
        .first()
        .map(|q| q.name().to_ascii().to_ascii_lowercase())
        .unwrap_or_default();

    match zone.answers.get(&name) {
        Some(answers) => {
            reply.add_answers(answers.clone());
            if let Some(additionals) = zone.additionals.get(&name) {
                reply.add_additionals(additionals.clone());
            }
        }
        None => {
            reply.set_response_code(ResponseCode::NXDomain);
        }
    }

    Some(encode(&reply))
}
