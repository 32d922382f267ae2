use chrono::Utc;
use crate::actor_framework::Entity;
use crate::domain::{Produto, ProdutoCreate, ProdutoPatch};

impl Entity for Produto {
    type Id = u32;
    type CreateParams = ProdutoCreate;
    type Patch = ProdutoPatch;

    fn id(&self) -> &u32 { &self.id }

    /// Creates a new Produto from creation parameters.
    ///
    /// The creation timestamp is taken from the server clock here and never
    /// changes afterwards.
    fn from_create_params(id: u32, params: ProdutoCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            nome: params.nome,
            descricao: params.descricao,
            valor: params.valor,
            data_criacao: Utc::now(),
        })
    }

    fn on_create(&mut self) -> Result<(), String> {
        self.check_invariants()
    }

    /// Overwrites the three patchable fields.
    ///
    /// # Errors
    /// Returns an error if the result would break a stored invariant; the
    /// actor then keeps the previous record.
    fn on_update(&mut self, patch: ProdutoPatch) -> Result<(), String> {
        self.nome = patch.nome;
        self.descricao = patch.descricao;
        self.valor = patch.valor;
        self.check_invariants()
    }
}
