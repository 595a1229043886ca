//! Solve prompt rendering.
//!
//! [`build_prompt`] is a pure function: the same question, materials and
//! folder metadata always render the same bytes.

use solveai_core::defaults::MATERIAL_SEPARATOR;
use solveai_core::FolderInfo;

/// Materials block used when the request carries no context.
pub const NO_MATERIALS_FALLBACK: &str =
    "Nenhum material de contexto fornecido. Use seu conhecimento geral.";

const PREAMBLE: &str = "\
Você é o SolveAI, especialista em resolver questões acadêmicas usando um fluxo estruturado e verificações rigorosas.

REGRAS CRÍTICAS DE INTEGRIDADE:
1. NUNCA invente dados que não estão no problema. Se faltar algum dado necessário, liste em \"missingData\".
2. NUNCA use fórmulas sem citar a fonte exata (slide X, página Y, ou \"conhecimento geral\").
3. Se não tiver 100% de certeza, defina confidence como \"media\" ou \"baixa\" e explique em confidenceReason.
4. Se algo parecer estranho ou ambíguo, adicione em \"warnings\".";

const BOOK_INSTRUCTION: &str = "IMPORTANTE: Utilize as fórmulas, métodos e abordagem deste livro para resolver a questão. A resolução deve seguir o estilo e nomenclatura do livro indicado.";

const USE_MATERIALS: &str = "Use OBRIGATORIAMENTE os materiais da pasta fornecida abaixo:";

const SOLUTION_PROTOCOL: &str = r##"Execute o seguinte fluxo e retorne um JSON estruturado:

ETAPA 1 — INTERPRETAÇÃO E DETECÇÃO DE DADOS FALTANTES
- Transcreva o enunciado completo
- Liste TODOS os dados fornecidos (valores numéricos, unidades, condições)
- Diga exatamente o que cada item (a, b, c, etc.) está pedindo
- Se houver itens A), B), C) etc., identifique e explique o que cada um pede SEPARADAMENTE
- VERIFIQUE se algum dado necessário NÃO foi fornecido no problema
- Se faltar dados, liste-os em "missingData" e NÃO INVENTE valores
- Relacione com materiais da pasta (slide, fórmula, exemplo) se disponíveis
- Crie um plano de solução

ETAPA 2 — SOLUÇÃO A COM CITAÇÃO DE FONTES (EXTREMAMENTE DETALHADA)
- Resolva passo a passo cada item DE FORMA MUITO DETALHADA
- Para CADA fórmula usada, cite a fonte exata: "Fórmula X (Slide 3)" ou "Equação Y (página 45 do livro)" ou "Fórmula Z (conhecimento geral de física)"
- Usando EXATAMENTE as fórmulas/métodos do material (se disponível)
- Para cada item (A, B, C), mostre a resolução separada

REGRAS PARA CÁLCULOS DETALHADOS (MUITO IMPORTANTE):
1. SEMPRE mostre a fórmula original primeiro: $$F = m \cdot a$$
2. SEMPRE substitua os valores na fórmula mostrando cada número: $$F = 5 \, \text{kg} \cdot 2 \, \text{m/s}^2$$
3. SEMPRE mostre cálculos intermediários quando houver operações: $$F = 10 \, \text{N}$$
4. Para divisões/multiplicações complexas, mostre o passo a passo:
   - Primeiro: identifique os valores
   - Depois: substitua na fórmula
   - Em seguida: resolva numerador e denominador separadamente se aplicável
   - Por fim: calcule o resultado final
5. SEMPRE inclua as unidades em cada passo do cálculo
6. Use formatação LaTeX clara: $$\sigma = \frac{F}{A} = \frac{1000 \, \text{N}}{0.01 \, \text{m}^2} = 100000 \, \text{Pa} = 100 \, \text{kPa}$$
7. Para conversões de unidades, mostre explicitamente: $$100000 \, \text{Pa} = 100000 \times 10^{-3} \, \text{kPa} = 100 \, \text{kPa}$$
8. Numere cada passo: "Passo 1:", "Passo 2:", etc.

ETAPA 3 — VERIFICAÇÃO DE ADERÊNCIA
- Confira se a solução segue o professor/material
- Confira se algum dado foi ignorado
- Ajuste se necessário

ETAPA 4 — SOLUÇÃO B (INDEPENDENTE)
- Refazer a questão sem olhar a solução A
- Usando o mesmo método

ETAPA 5 — CONSISTÊNCIA
- Compare A e B
- Se houver diferença, corrija e produza Solução C

ETAPA 6 — ANÁLISE DIMENSIONAL
- Verifique se TODAS as unidades estão corretas em cada cálculo
- Confirme que o resultado final tem a unidade esperada
- Exemplo: metros + metros = metros (OK), metros + segundos = ERRO
- Se houver erro de unidades, corrija a solução

ETAPA 7 — VERIFICAÇÃO MATEMÁTICA
- Recalcular tudo
- Verificar arredondamento e lógica

ETAPA 8 — VERIFICAÇÃO REVERSA (BACK-CHECK)
- Pegue a resposta final obtida
- Substitua de volta na equação/problema original
- Verifique se os valores batem e fazem sentido
- Para equações: substitua o valor encontrado e confirme que ambos os lados são iguais
- Para física/química: use o resultado para recalcular um dado conhecido do problema
- Verifique se a ordem de grandeza faz sentido (ex: velocidade de carro não pode ser 50.000 km/h)
- Se a verificação falhar, identifique o erro e corrija a solução

ETAPA 9 — AVALIAÇÃO DE CONFIANÇA
- Avalie sua confiança na resposta: "alta", "media" ou "baixa"
- "alta": Todos os dados disponíveis, cálculos verificados, back-check passou
- "media": Alguma ambiguidade no enunciado OU não tinha material de referência
- "baixa": Dados faltando OU múltiplas interpretações possíveis OU back-check falhou
- Explique o motivo da sua avaliação em confidenceReason

ETAPA 10 — RESPOSTA FINAL
- Resposta final validada para cada item
- Passo a passo
- Fórmulas usadas com citação de fonte
- Resultado da verificação reversa
- Versão curta para prova
- Indicação do material utilizado (se houver)
- Liste todos os avisos importantes em "warnings"

IMPORTANTE: Retorne APENAS um JSON válido no seguinte formato (sem markdown, sem texto extra):"##;

/// Output contract example the model must mimic. Valid JSON.
pub const OUTPUT_SCHEMA_EXAMPLE: &str = r###"{
  "originalQuestion": "texto completo da questão transcrita",
  "extractedData": ["dado 1 com valor e unidade", "dado 2"],
  "questionItems": [
    {
      "letter": "A",
      "description": "O que o item A está pedindo",
      "formulas": ["$$F = ma$$", "$$v = v_0 + at$$"],
      "concepts": ["Segunda Lei de Newton", "MRUV"],
      "detailedCalculation": "## Cálculo Detalhado\n\n**Passo 1: Identificar os dados do problema**\n- Massa: $m = 5 \\, \\text{kg}$\n- Aceleração: $a = 2 \\, \\text{m/s}^2$\n\n**Passo 2: Escolher a fórmula apropriada**\nUsaremos a Segunda Lei de Newton:\n$$F = m \\cdot a$$\n\n**Passo 3: Substituir os valores na fórmula**\n$$F = 5 \\, \\text{kg} \\cdot 2 \\, \\text{m/s}^2$$\n\n**Passo 4: Realizar o cálculo**\n$$F = 5 \\times 2 = 10$$\n\n**Passo 5: Expressar o resultado com unidade**\n$$F = 10 \\, \\text{N}$$\n\n**Verificação dimensional:**\n$[\\text{kg}] \\cdot [\\text{m/s}^2] = [\\text{kg} \\cdot \\text{m/s}^2] = [\\text{N}]$ ✓",
      "finalResult": "$$x = 10 \\text{ m}$$",
      "solutionSteps": [
        {"title": "Identificação dos dados", "content": "Massa m = 5kg..."},
        {"title": "Aplicação da fórmula", "content": "Usando F = ma..."},
        {"title": "Cálculo final", "content": "Resultado: 10 m"}
      ],
      "solution": "Resolução completa do item A (usado como fallback)"
    },
    {
      "letter": "B",
      "description": "O que o item B está pedindo",
      "formulas": ["$$E = mc^2$$"],
      "concepts": ["Relatividade"],
      "detailedCalculation": "Cálculo detalhado do item B...",
      "finalResult": "$$E = 9 \\times 10^{16} J$$",
      "solutionSteps": [],
      "solution": "Resolução completa do item B"
    }
  ],
  "steps": [
    {"title": "Interpretação", "content": "análise detalhada + dados faltantes identificados"},
    {"title": "Solução A", "content": "resolução passo a passo com citação de fontes"},
    {"title": "Verificação de Aderência", "content": "conferência"},
    {"title": "Solução B", "content": "segunda resolução"},
    {"title": "Consistência", "content": "comparação"},
    {"title": "Análise Dimensional", "content": "verificação de unidades"},
    {"title": "Verificação Matemática", "content": "recálculo"},
    {"title": "Verificação Reversa", "content": "substituição da resposta no problema original para confirmar"},
    {"title": "Avaliação de Confiança", "content": "nível de certeza e justificativa"},
    {"title": "Resposta Final", "content": "validação final com avisos"}
  ],
  "finalAnswer": "Resposta final formatada em markdown com todas as respostas",
  "usedMaterials": ["material 1 usado", "material 2"],
  "shortVersion": "Respostas resumidas: a) X | b) Y | c) Z",
  "confidence": "alta | media | baixa",
  "confidenceReason": "Explicação do nível de confiança",
  "warnings": ["Aviso 1 se houver ambiguidade", "Aviso 2 se algo parecer estranho"],
  "missingData": ["Dado que faltou no problema e não foi inventado"],
  "sourceCitations": [
    {"formula": "F = ma", "source": "Slide 3 - Leis de Newton"},
    {"formula": "v = d/t", "source": "Conhecimento geral de física"}
  ]
}"###;

const NO_ITEMS_NOTE: &str = "Se a questão não tiver itens separados (a, b, c), deixe questionItems como array vazio e coloque toda a resolução em steps e finalAnswer.";

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Folder metadata block. Empty when no folder is selected.
fn folder_block(folder_info: Option<&FolderInfo>) -> String {
    let Some(info) = folder_info else {
        return String::new();
    };

    let mut block = format!("\n[INFORMAÇÕES DA MATÉRIA: {}]", info.name);
    if let Some(book) = non_blank(&info.book_reference) {
        block.push_str("\nLIVRO DE REFERÊNCIA: ");
        block.push_str(book);
        block.push('\n');
        block.push_str(BOOK_INSTRUCTION);
    }
    if let Some(notes) = non_blank(&info.notes) {
        block.push_str("\nINFORMAÇÕES ADICIONAIS DO PROFESSOR/ALUNO: ");
        block.push_str(notes);
    }
    block.push('\n');
    block
}

/// Render the solve instruction for one question.
pub fn build_prompt(
    question_text: &str,
    context_materials: &[String],
    folder_info: Option<&FolderInfo>,
) -> String {
    let materials = if context_materials.is_empty() {
        NO_MATERIALS_FALLBACK.to_string()
    } else {
        context_materials.join(MATERIAL_SEPARATOR)
    };

    let mut prompt = String::with_capacity(
        PREAMBLE.len()
            + SOLUTION_PROTOCOL.len()
            + OUTPUT_SCHEMA_EXAMPLE.len()
            + materials.len()
            + question_text.len()
            + 1024,
    );

    prompt.push_str(PREAMBLE);
    prompt.push('\n');
    prompt.push_str(&folder_block(folder_info));
    prompt.push('\n');
    if !context_materials.is_empty() {
        prompt.push_str(USE_MATERIALS);
    }
    prompt.push_str("\n\n[MATERIAIS DA PASTA]\n");
    prompt.push_str(&materials);
    prompt.push_str("\n\n[QUESTÃO A RESOLVER]\n");
    prompt.push_str(question_text);
    prompt.push_str("\n\n");
    prompt.push_str(SOLUTION_PROTOCOL);
    prompt.push('\n');
    prompt.push_str(OUTPUT_SCHEMA_EXAMPLE);
    prompt.push_str("\n\n");
    prompt.push_str(NO_ITEMS_NOTE);
    prompt
}
