//! # Pool de Workers
//! src/server/pool.rs
//!
//! Un número fijo de threads consume una cola FIFO compartida
//! (`Mutex` + `Condvar`). El acceptor solo encola; los workers hacen el trabajo.
//!
//! La política de backlog es explícita:
//! - `Backlog::Unbounded`: la cola crece sin límite bajo sobrecarga.
//! - `Backlog::Bounded(n)`: con `n` elementos esperando, `submit` rechaza y
//!   devuelve el elemento al llamador.

use std::collections::VecDeque;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

/// Política para trabajo pendiente cuando todos los workers están ocupados
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backlog {
    /// Sin límite (sin control de admisión)
    Unbounded,

    /// Como máximo `n` elementos esperando
    Bounded(usize),
}

impl Backlog {
    /// `0` significa sin límite
    pub fn from_capacity(capacity: usize) -> Self {
        match capacity {
            0 => Backlog::Unbounded,
            n => Backlog::Bounded(n),
        }
    }
}

/// Elemento rechazado por cola llena
#[derive(Debug)]
pub struct Rejected<T>(pub T);

/// Cola FIFO thread-safe
struct Queue<T> {
    items: Mutex<VecDeque<T>>,

    /// Notifica a los workers cuando hay nuevos elementos
    available: Condvar,

    backlog: Backlog,
}

impl<T> Queue<T> {
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        // Un pánico nunca deja la cola a medio modificar
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Encola respetando la política de backlog
    fn push(&self, item: T) -> Result<(), Rejected<T>> {
        let mut items = self.lock();

        if let Backlog::Bounded(capacity) = self.backlog {
            if items.len() >= capacity {
                return Err(Rejected(item));
            }
        }

        items.push_back(item);
        self.available.notify_one();
        Ok(())
    }

    /// Bloquea hasta que haya un elemento
    fn pop(&self) -> T {
        let mut items = self.lock();

        loop {
            if let Some(item) = items.pop_front() {
                return item;
            }
            items = self
                .available
                .wait(items)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}

/// Pool de tamaño fijo que aplica `job` a cada elemento encolado
pub struct WorkerPool<T> {
    queue: Arc<Queue<T>>,
    workers: Vec<JoinHandle<()>>,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Arranca `size` workers llamados `{name}-{i}`
    ///
    /// Los workers viven mientras viva el proceso: no hay apagado.
    pub fn new<F>(size: usize, backlog: Backlog, name: &str, job: F) -> io::Result<Self>
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let queue = Arc::new(Queue {
            items: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            backlog,
        });
        let job = Arc::new(job);

        let mut workers = Vec::with_capacity(size);
        for i in 0..size {
            let queue = Arc::clone(&queue);
            let job = Arc::clone(&job);
            let worker_name = format!("{}-{}", name, i);

            let handle = thread::Builder::new()
                .name(worker_name.clone())
                .spawn(move || Self::worker_loop(&worker_name, &queue, job.as_ref()))?;
            workers.push(handle);
        }

        Ok(Self { queue, workers })
    }

    /// Loop principal del worker
    fn worker_loop<F>(name: &str, queue: &Queue<T>, job: &F)
    where
        F: Fn(T),
    {
        debug!(worker = name, "worker started");

        loop {
            let item = queue.pop();

            // Un pánico en el trabajo no debe reducir el pool
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| job(item))) {
                error!(
                    worker = name,
                    panic = panic_message(payload.as_ref()),
                    "job panicked"
                );
            }
        }
    }

    /// Encola un elemento para el próximo worker libre
    pub fn submit(&self, item: T) -> Result<(), Rejected<T>> {
        self.queue.push(item)
    }

    /// Elementos esperando worker
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Cantidad de workers
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    pub fn backlog(&self) -> Backlog {
        self.queue.backlog
    }
}

/// Texto de un payload de pánico
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
