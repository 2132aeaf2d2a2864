//! Prompt templates for the generative service
//!
//! Prompts are written in Portuguese, the language of the documents being
//! analyzed, and every template closes with the pure-JSON output contract
//! the response parser is built to defend anyway.

/// Truncate on a char boundary; text beyond the cap is silently omitted.
pub(crate) fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Prompt for extracting every creditor from one block of document text.
pub(crate) fn extraction_prompt(text: &str, document_label: &str, text_limit: usize) -> String {
    format!(
        r#"Você é um especialista em análise de documentos financeiros brasileiros. Analise o seguinte texto extraído de um Quadro Geral de Credores (QGC) e extraia TODAS as informações dos credores de forma estruturada.

DOCUMENTO: {document_label}

TEXTO DO PDF:
{text}

INSTRUÇÕES:
1. Identifique e extraia informações de TODOS os credores mencionados no documento
2. Para cada credor, extraia o máximo de informações disponíveis
3. Campos típicos incluem: nome, CNPJ/CPF, valor, categoria, classificação, garantia, etc.
4. Se um campo não estiver disponível, use null
5. Mantenha valores monetários como strings para preservar a formatação original
6. Seja preciso e não invente informações

FORMATO DE SAÍDA:
Retorne APENAS um JSON válido com um array de objetos, onde cada objeto representa um credor:

[
  {{
    "nome": "Nome do Credor",
    "documento": "CNPJ/CPF se disponível",
    "valor": "Valor como string",
    "categoria": "Categoria se disponível",
    "classificacao": "Classificação se disponível",
    "garantia": "Tipo de garantia se disponível",
    "observacoes": "Observações adicionais se disponíveis"
  }}
]

IMPORTANTE: Responda APENAS com o JSON, sem texto adicional antes ou depois.
"#,
        document_label = document_label,
        text = truncate_chars(text, text_limit),
    )
}

/// Prompt for merging duplicate creditors within one batch.
pub(crate) fn consolidation_prompt(records_json: &str, count: usize, document_label: &str) -> String {
    format!(
        r#"Você é um especialista em consolidação de dados financeiros. Analise a seguinte lista de credores que pode conter duplicatas.

DOCUMENTO: {document_label}
CREDORES ({count} total):
{records_json}

INSTRUÇÕES:
1. Identifique e consolide credores duplicados (mesmo credor mencionado múltiplas vezes)
2. Para duplicatas, mantenha apenas UMA entrada com todas as informações consolidadas
3. Use matching inteligente (considere variações de nome, formatação, etc.)
4. Preserve TODOS os credores únicos - não omita nenhum
5. Remova o campo "_source_pages" do resultado final

FORMATO DE SAÍDA:
Retorne APENAS um JSON válido com array de credores únicos consolidados:

[
  {{
    "nome": "Nome do Credor",
    "documento": "CNPJ/CPF",
    "valor": "Valor"
  }}
]

IMPORTANTE:
- Responda APENAS com o JSON, sem texto adicional
- Inclua TODOS os credores únicos, mesmo que não haja duplicatas
"#,
        document_label = document_label,
        count = count,
        records_json = records_json,
    )
}

/// Prompt for reconciling two versions of a creditor list.
pub(crate) fn comparison_prompt(old_json: &str, new_json: &str, list_limit: usize) -> String {
    format!(
        r#"Você é um especialista em análise comparativa de documentos financeiros. Compare duas listas de credores de diferentes versões de um Quadro Geral de Credores (QGC) e identifique mudanças de forma inteligente.

CREDORES DA VERSÃO ANTERIOR:
{old_json}

CREDORES DA VERSÃO ATUAL:
{new_json}

INSTRUÇÕES:
1. Compare os credores usando matching inteligente (considere variações no nome, formatação, etc.)
2. Identifique credores novos, removidos, modificados e inalterados
3. Para credores modificados, identifique especificamente quais campos mudaram
4. Calcule scores de confiança para os matches (0.0 a 1.0)
5. Seja preciso na identificação de mudanças

FORMATO DE SAÍDA:
Retorne APENAS um JSON válido com a seguinte estrutura:

{{
  "new_creditors": [],
  "removed_creditors": [],
  "modified_creditors": [
    {{
      "creditor": {{}},
      "old_values": {{}},
      "changes": "descrição das mudanças",
      "confidence_score": 0.0
    }}
  ],
  "unchanged_creditors": [],
  "summary": {{
    "total_old": 0,
    "total_new": 0,
    "new_count": 0,
    "removed_count": 0,
    "modified_count": 0,
    "unchanged_count": 0
  }}
}}

IMPORTANTE: Responda APENAS com o JSON, sem texto adicional.
"#,
        old_json = truncate_chars(old_json, list_limit),
        new_json = truncate_chars(new_json, list_limit),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_ascii() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("ab", 3), "ab");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        // Never panics on a char boundary inside accented text.
        assert_eq!(truncate_chars("créditos", 3), "cré");
    }

    #[test]
    fn test_extraction_prompt_respects_limit() {
        let text = "x".repeat(10_000);
        let prompt = extraction_prompt(&text, "QGC Teste", 8000);
        assert!(prompt.contains(&"x".repeat(8000)));
        assert!(!prompt.contains(&"x".repeat(8001)));
        assert!(prompt.contains("DOCUMENTO: QGC Teste"));
    }

    #[test]
    fn test_consolidation_prompt_mentions_provenance_field() {
        let prompt = consolidation_prompt("[]", 0, "QGC Teste");
        assert!(prompt.contains("_source_pages"));
        assert!(prompt.contains("0 total"));
    }

    #[test]
    fn test_comparison_prompt_truncates_each_list() {
        let old_json = "o".repeat(5000);
        let new_json = "n".repeat(5000);
        let prompt = comparison_prompt(&old_json, &new_json, 4000);
        assert!(prompt.contains(&"o".repeat(4000)));
        assert!(!prompt.contains(&"o".repeat(4001)));
        assert!(prompt.contains(&"n".repeat(4000)));
        assert!(!prompt.contains(&"n".repeat(4001)));
    }
}
