//! プロンプト生成モジュール
//!
//! - CHARACTER_SYSTEM_INSTRUCTION: 構造化キャラクタープロンプトの指示文
//! - build_character_prompt: テーマから生成リクエスト用プロンプトを組み立て
//! - DEFAULT_KEYWORD_PROMPT: 画像保存時のキーワード抽出用プロンプト

/// 構造化キャラクタープロンプトの指示文
///
/// 見出しは `FieldSet::standard()` の表示名と一致させること
pub const CHARACTER_SYSTEM_INSTRUCTION: &str = r#"You are an expert at creating detailed image generation prompts. Create a character prompt based on the user's theme using the following structure:
• Subject: Who or what is in the image? Be specific. (e.g., a stoic robot barista with glowing blue optics; a fluffy calico cat wearing a tiny wizard hat).
• Composition: How is the shot framed? (e.g., extreme close-up, wide shot, low angle shot, portrait).
• Action: What is happening? (e.g., brewing a cup of coffee, casting a magical spell, mid-stride running through a field).
• Location: Where does the scene take place? (e.g., a futuristic cafe on Mars, a cluttered alchemist's library, a sun-drenched meadow at golden hour).
• Style: What is the overall aesthetic? (e.g., 3D animation, film noir, watercolor painting, photorealistic, 1990s product photography).
• Editing Instructions: For modifying an existing image, be direct and specific. (e.g., change the man's tie to green, remove the car in the background)
• Camera and lighting details: Direct the shot like a cinematographer. (e.g., "A low-angle shot with a shallow depth of field (f/1.8)," "Golden hour backlighting creating long shadows," "Cinematic color grading with muted teal tones.")
• Specific text integration: Clearly state what text should appear and how it should look. (e.g., "The headline 'URBAN EXPLORER' rendered in bold, white, sans-serif font at the top.")
• Factual constraints (for diagrams): Specify the need for accuracy and ensure your inputs themselves are factual (e.g., "A scientifically accurate cross-section diagram," "Ensure historical accuracy for the Victorian era.").

Answer with exactly one line per heading, starting with the heading name followed by a colon. Write N/A when a heading does not apply.

Example of the generated result:
Subject: A young woman with pale skin and a very slender, skinny build with a small waist. She has grey hair with distinct pink and blue highlights. She is wearing a black satin corset with mesh panels and subtle leather strapping details, accessorized with a simple black velvet choker.
Composition: A photorealistic close-up portrait, framed from the chest to the top of the head.
Action: She is seated at a cluttered antique vanity table. Her body is turned away, but she turns her head over her shoulder to look directly into the camera with a sultry, confident gaze. One hand rests on the aged wooden table near a perfume bottle.
Location: A dimly lit, bohemian bedroom in Paris. The background consists of a warm bokeh of tarnished silver hand-mirrors, vintage cosmetics, and heavy, dark tapestries.
Style: Photorealistic, cinematic, and ultra-high resolution (8k). The aesthetic should mimic the look of Kodak Portra 400 film.
Editing Instructions: N/A
Camera and lighting details: Shot on Kodak Portra 400 film. The scene is lit by the warm, soft glow of a vintage desk lamp on the vanity, creating deep shadows and intimate highlights on her décolletage and the metallic hair highlights.
Specific text integration: N/A
Factual constraints (for diagrams): N/A"#;

/// 画像保存時のキーワード抽出プロンプト（ビジョンモデル用）
pub const DEFAULT_KEYWORD_PROMPT: &str = "Describe this image with 3 to 6 short keywords joined by underscores, for example: red_fox_snowy_forest. Answer with the keywords only.";

/// キャラクタープロンプト生成用の全文を組み立て
///
/// # Arguments
/// * `theme` - ユーザーが入力したテーマ
pub fn build_character_prompt(theme: &str) -> String {
    format!(
        "{}\n\nTheme: {}\nGenerate the character prompt:",
        CHARACTER_SYSTEM_INSTRUCTION,
        theme.trim()
    )
}
